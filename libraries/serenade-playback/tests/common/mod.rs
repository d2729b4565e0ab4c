//! Shared helpers for engine tests

#![allow(dead_code)]

use serenade_playback::{
    AudioOutput, MemoryPreferenceStore, PlaybackConfig, PlaybackEngine, PlaybackError, Playlist,
    Result, Track, VOLUME_PREFERENCE_KEY,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Observable state of one mock output handle
#[derive(Debug, Default)]
pub struct OutputState {
    pub source: Option<String>,
    pub loads: usize,
    pub volume: f32,
    pub playing: bool,
    pub play_calls: usize,
    pub pause_calls: usize,
}

/// Mock output recording everything the engine does to it
pub struct MockOutput {
    state: Arc<Mutex<OutputState>>,
    allow_play: Arc<AtomicBool>,
}

impl AudioOutput for MockOutput {
    fn set_source(&mut self, track: &Track) {
        self.state.lock().unwrap().source = Some(track.source.clone());
    }

    fn load(&mut self) {
        self.state.lock().unwrap().loads += 1;
    }

    fn play(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.play_calls += 1;
        if !self.allow_play.load(Ordering::SeqCst) {
            return Err(PlaybackError::Blocked(
                "play() can only be initiated by a user gesture".to_string(),
            ));
        }
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        state.pause_calls += 1;
    }

    fn volume(&self) -> f32 {
        self.state.lock().unwrap().volume
    }

    fn set_volume(&mut self, volume: f32) {
        assert!(
            (0.0..=1.0).contains(&volume),
            "volume {} escaped the 0..=1 range",
            volume
        );
        self.state.lock().unwrap().volume = volume;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }
}

/// Every output handle the engine has created, in creation order
#[derive(Clone, Default)]
pub struct OutputRegistry {
    outputs: Arc<Mutex<Vec<Arc<Mutex<OutputState>>>>>,
    pub allow_play: Arc<AtomicBool>,
}

impl OutputRegistry {
    pub fn new(allow_play: bool) -> Self {
        let registry = Self::default();
        registry.allow_play.store(allow_play, Ordering::SeqCst);
        registry
    }

    pub fn count(&self) -> usize {
        self.outputs.lock().unwrap().len()
    }

    pub fn get(&self, index: usize) -> Arc<Mutex<OutputState>> {
        self.outputs.lock().unwrap()[index].clone()
    }

    pub fn volume(&self, index: usize) -> f32 {
        self.get(index).lock().unwrap().volume
    }

    pub fn playing(&self, index: usize) -> bool {
        self.get(index).lock().unwrap().playing
    }

    pub fn set_allow_play(&self, allow: bool) {
        self.allow_play.store(allow, Ordering::SeqCst);
    }

    fn create(&self) -> Box<dyn AudioOutput> {
        let state = Arc::new(Mutex::new(OutputState::default()));
        self.outputs.lock().unwrap().push(state.clone());
        Box::new(MockOutput {
            state,
            allow_play: self.allow_play.clone(),
        })
    }
}

pub fn three_tracks() -> Playlist {
    Playlist::new(vec![
        Track::new("music/one.mp3", "One", "First Artist"),
        Track::new("music/two.mp3", "Two", "Second Artist"),
        Track::new("music/three.mp3", "Three", ""),
    ])
    .unwrap()
}

/// Engine over three tracks with the stored volume at `volume` percent
pub fn engine_with(registry: &OutputRegistry, volume: u8) -> PlaybackEngine {
    let factory_registry = registry.clone();
    let factory = move || factory_registry.create();

    PlaybackEngine::new(
        three_tracks(),
        PlaybackConfig::default(),
        Box::new(factory),
        Box::new(MemoryPreferenceStore::with_value(
            VOLUME_PREFERENCE_KEY,
            &volume.to_string(),
        )),
    )
}
