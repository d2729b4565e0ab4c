/// Simulated audio output
///
/// Stands in for a browser audio element: it remembers the source, volume
/// and play state and logs every transition. Playback is refused until the
/// shared autoplay gate opens, the way browsers refuse sound before the
/// first gesture.
use serenade_playback::{AudioOutput, OutputFactory, PlaybackError, Result, Track};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Shared switch deciding whether outputs may start
#[derive(Debug, Clone, Default)]
pub struct AutoplayGate(Arc<AtomicBool>);

impl AutoplayGate {
    pub fn new(allowed: bool) -> Self {
        Self(Arc::new(AtomicBool::new(allowed)))
    }

    pub fn allow(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_allowed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct SimulatedOutput {
    id: usize,
    gate: AutoplayGate,
    source: Option<String>,
    volume: f32,
    playing: bool,
}

impl SimulatedOutput {
    pub fn new(id: usize, gate: AutoplayGate) -> Self {
        Self {
            id,
            gate,
            source: None,
            volume: 1.0,
            playing: false,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl AudioOutput for SimulatedOutput {
    fn set_source(&mut self, track: &Track) {
        debug!(output = self.id, "Source set to {}", track.source);
        self.source = Some(track.source.clone());
    }

    fn load(&mut self) {
        trace!(output = self.id, "Load");
    }

    fn play(&mut self) -> Result<()> {
        if !self.gate.is_allowed() {
            return Err(PlaybackError::Blocked(
                "play() can only be initiated by a user gesture".to_string(),
            ));
        }
        if self.source.is_none() {
            return Err(PlaybackError::Output("no source set".to_string()));
        }

        debug!(output = self.id, "Play");
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            debug!(output = self.id, "Pause");
        }
        self.playing = false;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

/// Creates numbered [`SimulatedOutput`]s sharing one gate
pub struct SimulatedOutputFactory {
    gate: AutoplayGate,
    created: Arc<AtomicUsize>,
}

impl SimulatedOutputFactory {
    pub fn new(gate: AutoplayGate) -> Self {
        Self {
            gate,
            created: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of outputs created so far, readable after the factory moves
    pub fn created_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.created)
    }
}

impl OutputFactory for SimulatedOutputFactory {
    fn create(&mut self) -> Box<dyn AudioOutput> {
        let id = self.created.fetch_add(1, Ordering::SeqCst);
        Box::new(SimulatedOutput::new(id, self.gate.clone()))
    }
}
