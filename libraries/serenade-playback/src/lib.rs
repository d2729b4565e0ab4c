//! Serenade - Playback Engine
//!
//! Platform-agnostic background music engine for the landing page.
//!
//! This crate provides:
//! - Track selection over a fixed playlist (wrapping in both directions)
//! - Eased volume fades for play, pause and volume changes
//! - Crossfade between tracks (eased fade-in, linear fade-out)
//! - Autoplay fallback with a one-shot retry on the first user gesture
//! - Volume preference persistence
//! - An async task wrapper driven by a frame interval
//!
//! # Architecture
//!
//! The engine never touches audio hardware or the DOM directly. Outputs are
//! created through [`OutputFactory`], the preference lives behind
//! [`PreferenceStore`], and the view is fed with [`PlayerEvent`]s.
//! Time is passed in explicitly, so every transition is deterministic.
//!
//! # Example: Driving the engine by hand
//!
//! ```rust
//! use serenade_playback::{
//!     AudioOutput, MemoryPreferenceStore, PlaybackConfig, PlaybackEngine, Playlist, Result, Track,
//! };
//! use std::time::{Duration, Instant};
//!
//! #[derive(Default)]
//! struct SilentOutput {
//!     volume: f32,
//!     playing: bool,
//! }
//!
//! impl AudioOutput for SilentOutput {
//!     fn set_source(&mut self, _track: &Track) {}
//!     fn load(&mut self) {}
//!     fn play(&mut self) -> Result<()> {
//!         self.playing = true;
//!         Ok(())
//!     }
//!     fn pause(&mut self) {
//!         self.playing = false;
//!     }
//!     fn volume(&self) -> f32 {
//!         self.volume
//!     }
//!     fn set_volume(&mut self, volume: f32) {
//!         self.volume = volume;
//!     }
//!     fn is_playing(&self) -> bool {
//!         self.playing
//!     }
//! }
//!
//! let factory = || -> Box<dyn AudioOutput> { Box::new(SilentOutput::default()) };
//! let mut engine = PlaybackEngine::new(
//!     Playlist::default(),
//!     PlaybackConfig::default(),
//!     Box::new(factory),
//!     Box::new(MemoryPreferenceStore::new()),
//! );
//!
//! let t0 = Instant::now();
//! engine.start(t0);
//! engine.tick(t0 + Duration::from_millis(1600));
//! assert!(engine.is_playing());
//! assert!((engine.output_volume() - 0.6).abs() < 1e-6);
//!
//! engine.next_track(t0 + Duration::from_secs(2));
//! assert_eq!(engine.current_index(), 1);
//! assert!(engine.is_crossfading());
//! ```

mod driver;
mod engine;
mod error;
mod events;
mod fade;
mod output;
pub mod types;
mod volume;

// Public exports
pub use driver::{spawn_player, DriverConfig, PlayerCommand, PlayerHandle, PlayerTask};
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use fade::{Fade, FadeCurve, FadeState};
pub use output::{AudioOutput, OutputFactory};
pub use types::{FadeTimings, PlaybackConfig, Playlist, Track, TrackListEntry};
pub use volume::{
    load_volume, JsonFilePreferenceStore, MemoryPreferenceStore, PreferenceStore, VolumeLevel,
    VOLUME_PREFERENCE_KEY,
};
