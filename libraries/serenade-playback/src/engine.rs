//! Playback engine - core orchestration
//!
//! Owns the single source of truth for what track is selected, how loud it
//! should be and whether it is playing. Every volume change is a timed fade,
//! advanced by [`PlaybackEngine::tick`] once per frame.

use crate::{
    error::Result,
    events::PlayerEvent,
    fade::{Fade, FadeCurve},
    output::{AudioOutput, OutputFactory},
    types::{PlaybackConfig, Playlist, Track, TrackListEntry},
    volume::{load_volume, PreferenceStore, VolumeLevel, VOLUME_PREFERENCE_KEY},
};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Below this level a starting output is snapped to exact silence
const SILENCE_THRESHOLD: f32 = 0.005;

/// Output kept alive only to finish its ramp to zero
struct FadingOut {
    output: Box<dyn AudioOutput>,
    fade: Fade,
}

/// Background music engine
///
/// Platform code supplies outputs (via [`OutputFactory`]) and a preference
/// store, calls the control methods from UI handlers and calls `tick` once
/// per animation frame.
pub struct PlaybackEngine {
    playlist: Playlist,
    config: PlaybackConfig,

    // Selection and play state
    current_index: usize,
    playing: bool,
    volume: VolumeLevel,

    // Output handles: at most one active and one fading out
    active: Box<dyn AudioOutput>,
    fading_out: Option<FadingOut>,
    factory: Box<dyn OutputFactory>,

    // Fade on the active output; replaced (cancelled) by every new fade
    active_fade: Option<Fade>,

    // Volume target from the slider, picked up on the next frame
    pending_volume: Option<f32>,

    // Deferred stop after a pause fade
    pending_stop: Option<Instant>,

    // Autoplay fallback
    notice_visible: bool,
    gesture_armed: bool,
    user_interacted: bool,

    preferences: Box<dyn PreferenceStore>,

    // Event queue for the view
    pending_events: Vec<PlayerEvent>,
}

impl PlaybackEngine {
    /// Create a new engine
    ///
    /// Reads the stored volume preference and applies it to the first output.
    pub fn new(
        playlist: Playlist,
        config: PlaybackConfig,
        mut factory: Box<dyn OutputFactory>,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let volume = load_volume(
            preferences.as_ref(),
            VolumeLevel::new(config.default_volume),
        );

        let mut active = factory.create();
        active.set_volume(volume.gain());

        debug!(
            "Playback engine created: {} tracks, volume {}",
            playlist.len(),
            volume.level()
        );

        Self {
            playlist,
            config,
            current_index: 0,
            playing: false,
            volume,
            active,
            fading_out: None,
            factory,
            active_fade: None,
            pending_volume: None,
            pending_stop: None,
            notice_visible: false,
            gesture_armed: false,
            user_interacted: false,
            preferences,
            pending_events: Vec::new(),
        }
    }

    // ===== Startup =====

    /// Load the first track and try to autoplay it
    ///
    /// If the platform refuses, the volume is restored to the preferred
    /// level, the engine falls back to paused and the notice is shown. The
    /// first user interaction afterwards retries once.
    pub fn start(&mut self, now: Instant) {
        self.gesture_armed = true;
        self.load_track(0, now);

        let target = self.volume.gain();
        self.active.set_volume(0.0);
        self.set_playing(true);

        match self.active.play() {
            Ok(()) => {
                info!("Autoplay started: {}", self.current_track().title);
                self.fade_to(target, self.config.timings.autoplay, now);
                self.set_notice(false);
            }
            Err(e) => {
                info!("Autoplay not allowed, waiting for a user gesture: {}", e);
                self.active.set_volume(target);
                self.set_playing(false);
                self.set_notice(true);
                self.emit_blocked(e.to_string());
            }
        }
    }

    // ===== Playback Control =====

    /// Start or resume playback with a fade-in to the preferred volume
    ///
    /// A refusal from the platform reverts to paused and shows the notice;
    /// the error is returned but is not fatal.
    pub fn play(&mut self, now: Instant) -> Result<()> {
        self.user_interacted = true;
        let target = self.volume.gain();

        // Avoid an audible pop from a near-silent leftover level
        if self.active.volume() < SILENCE_THRESHOLD {
            self.active.set_volume(0.0);
        }
        self.set_playing(true);

        match self.active.play() {
            Ok(()) => {
                self.set_notice(false);
                self.fade_to(target, self.config.timings.play, now);
                Ok(())
            }
            Err(e) => {
                warn!("Playback blocked or failed: {}", e);
                self.set_playing(false);
                self.set_notice(true);
                self.emit_blocked(e.to_string());
                Err(e)
            }
        }
    }

    /// Fade to silence, then stop the output
    ///
    /// The UI flips to paused immediately; the stop itself is deferred until
    /// the fade has finished and is skipped if playback resumed meanwhile.
    pub fn pause(&mut self, now: Instant) {
        self.fade_to(0.0, self.config.timings.pause, now);
        self.pending_stop = Some(now + self.config.timings.pause_stop);
        self.set_playing(false);
    }

    /// Toggle button handler
    pub fn toggle(&mut self, now: Instant) -> Result<()> {
        if self.playing {
            self.pause(now);
            Ok(())
        } else {
            self.play(now)
        }
    }

    /// Select a track by (possibly negative or out-of-range) index
    ///
    /// While playing this crossfades into the new track; otherwise the
    /// active output is just pointed at it.
    pub fn load_track(&mut self, index: i64, now: Instant) {
        let previous = self.current_index;
        self.current_index = self.playlist.wrap_index(index);
        let track = self.playlist.get(self.current_index).clone();

        if self.playing {
            self.crossfade_to(&track, previous, now);
        } else {
            self.active.set_source(&track);
            self.active.load();
        }

        debug!("Loaded track {}: {}", self.current_index, track.title);
        self.pending_events.push(PlayerEvent::TrackChanged {
            index: self.current_index,
            title: track.title,
            artist: track.artist,
        });
    }

    /// Advance to the next track (wrapping); does not start playback
    pub fn next_track(&mut self, now: Instant) {
        self.load_track(self.current_index as i64 + 1, now);
    }

    /// Track list click: load the track and, if playing, re-run the play fade
    pub fn select_track(&mut self, index: usize, now: Instant) -> Result<()> {
        self.load_track(index as i64, now);
        if self.playing {
            self.play(now)?;
        }
        Ok(())
    }

    /// The active output reached the end of its track
    pub fn on_track_ended(&mut self, now: Instant) {
        debug!("Track {} ended", self.current_index);
        self.next_track(now);
    }

    /// Volume slider handler
    ///
    /// The level is persisted on every call. While playing, the fade is
    /// started on the next frame; a newer request replaces an older one that
    /// has not started yet.
    pub fn set_volume(&mut self, level: u8, _now: Instant) {
        let level = VolumeLevel::new(level);
        self.volume = level;

        if let Err(e) = self.preferences.set(VOLUME_PREFERENCE_KEY, &level.encode()) {
            warn!("Failed to persist volume {}: {}", level.level(), e);
        }
        self.pending_events.push(PlayerEvent::VolumeChanged {
            level: level.level(),
        });

        if self.playing {
            self.pending_volume = Some(level.gain());
        } else {
            self.active.set_volume(level.gain());
        }
    }

    /// First click/keypress/touch anywhere on the page
    ///
    /// One-shot: the listener disarms itself whether or not it retried.
    pub fn on_user_interaction(&mut self, now: Instant) {
        if !self.gesture_armed {
            return;
        }
        self.gesture_armed = false;

        if !self.playing && self.notice_visible {
            info!("Retrying playback after user gesture");
            if let Err(e) = self.play(now) {
                debug!("Retry after gesture failed: {}", e);
            }
        }
    }

    // ===== Frame processing =====

    /// Advance all fades and timers to `now`
    ///
    /// Call once per animation frame. Order: pending slider fade, active
    /// fade, fading-out ramp (stopping the handle at silence), deferred stop.
    pub fn tick(&mut self, now: Instant) {
        if let Some(target) = self.pending_volume.take() {
            self.fade_to(target, self.config.timings.volume, now);
        }

        if let Some(fade) = self.active_fade.as_mut() {
            let volume = fade.step(now);
            self.active.set_volume(volume);
            if !fade.is_active() {
                self.active_fade = None;
            }
        }

        let fade_out_done = match self.fading_out.as_mut() {
            Some(fading) => {
                let volume = fading.fade.step(now);
                fading.output.set_volume(volume);
                !fading.fade.is_active()
            }
            None => false,
        };
        if fade_out_done {
            if let Some(mut fading) = self.fading_out.take() {
                fading.output.pause();
                debug!("Crossfade finished, outgoing output released");
                self.pending_events.push(PlayerEvent::CrossfadeCompleted);
            }
        }

        if let Some(deadline) = self.pending_stop {
            if now >= deadline {
                self.pending_stop = None;
                if !self.playing {
                    self.active.pause();
                    self.pending_events.push(PlayerEvent::OutputStopped);
                } else {
                    debug!("Playback resumed before deferred stop, keeping output");
                }
            }
        }
    }

    // ===== State Queries =====

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> &Track {
        self.playlist.get(self.current_index)
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    /// User-selected volume
    pub fn volume(&self) -> VolumeLevel {
        self.volume
    }

    /// Live volume of the active output
    pub fn output_volume(&self) -> f32 {
        self.active.volume()
    }

    /// Live volume of the fading-out output, if a crossfade is in progress
    pub fn fading_out_volume(&self) -> Option<f32> {
        self.fading_out.as_ref().map(|f| f.output.volume())
    }

    pub fn is_crossfading(&self) -> bool {
        self.fading_out.is_some()
    }

    /// Whether a fade on the active output is still running
    pub fn is_fading(&self) -> bool {
        self.active_fade.is_some() || self.pending_volume.is_some()
    }

    pub fn notice_visible(&self) -> bool {
        self.notice_visible
    }

    pub fn gesture_armed(&self) -> bool {
        self.gesture_armed
    }

    pub fn user_interacted(&self) -> bool {
        self.user_interacted
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Rows for the track list, with the current track marked active
    pub fn track_list(&self) -> Vec<TrackListEntry> {
        self.playlist
            .tracks()
            .iter()
            .enumerate()
            .map(|(index, track)| TrackListEntry {
                index,
                title: track.title.clone(),
                active: index == self.current_index,
            })
            .collect()
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    /// Start an eased fade on the active output from its live volume
    ///
    /// Replaces any running fade and any slider target not yet picked up.
    fn fade_to(&mut self, target: f32, duration: Duration, now: Instant) {
        self.pending_volume = None;
        let fade = Fade::new(
            self.active.volume(),
            target,
            duration,
            FadeCurve::EaseInOutQuad,
            now,
        );

        if fade.is_active() {
            self.active_fade = Some(fade);
        } else {
            self.active.set_volume(fade.target());
            self.active_fade = None;
        }
    }

    /// Swap in a fresh output for `track` and ramp the old one down
    fn crossfade_to(&mut self, track: &Track, previous: usize, now: Instant) {
        let duration = self.config.timings.crossfade;

        if let Some(mut stale) = self.fading_out.take() {
            stale.output.pause();
            debug!("Dropped unfinished fade-out for a new crossfade");
        }

        let incoming = self.factory.create();
        let outgoing = std::mem::replace(&mut self.active, incoming);

        // The running fade belonged to the outgoing handle
        self.active_fade = None;
        self.pending_volume = None;
        self.pending_stop = None;

        let target = self.volume.gain();
        self.active.set_volume(0.0);
        self.active.set_source(track);
        self.active.load();

        match self.active.play() {
            Ok(()) => self.fade_to(target, duration, now),
            Err(e) => warn!("Crossfade new track play failed: {}", e),
        }

        let fade = Fade::new(outgoing.volume(), 0.0, duration, FadeCurve::Linear, now);
        self.fading_out = Some(FadingOut {
            output: outgoing,
            fade,
        });

        self.pending_events.push(PlayerEvent::CrossfadeStarted {
            from_index: previous,
            to_index: self.current_index,
            duration_ms: duration.as_millis() as u64,
        });
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.pending_events
                .push(PlayerEvent::StateChanged { playing });
        }
    }

    fn set_notice(&mut self, visible: bool) {
        if self.notice_visible != visible {
            self.notice_visible = visible;
            self.pending_events
                .push(PlayerEvent::AutoplayNotice { visible });
        }
    }

    fn emit_blocked(&mut self, reason: String) {
        self.pending_events
            .push(PlayerEvent::PlaybackBlocked { reason });
    }
}
