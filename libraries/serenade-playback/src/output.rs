//! Platform-agnostic audio output trait
//!
//! Abstracts the media element (or any other playback backend) the engine
//! drives. One handle plays one track at a time; a crossfade needs two.

use crate::error::Result;
use crate::types::Track;

/// A single audio output handle
///
/// Implementors own the actual decoding and hardware output. The engine only
/// points them at a track, starts and stops them, and moves their volume.
pub trait AudioOutput: Send {
    /// Point the output at a track without starting playback
    fn set_source(&mut self, track: &Track);

    /// Begin loading the current source
    fn load(&mut self);

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Output is playing
    /// * `Err(PlaybackError::Blocked(_))` - Platform refused (no user gesture yet)
    fn play(&mut self) -> Result<()>;

    /// Stop producing sound (position is kept)
    fn pause(&mut self);

    /// Current volume in 0.0..=1.0
    fn volume(&self) -> f32;

    /// Set volume; callers always pass values in 0.0..=1.0
    fn set_volume(&mut self, volume: f32);

    /// Whether the output is currently producing sound
    fn is_playing(&self) -> bool;
}

/// Creates fresh output handles for crossfades
pub trait OutputFactory: Send {
    fn create(&mut self) -> Box<dyn AudioOutput>;
}

impl<F> OutputFactory for F
where
    F: FnMut() -> Box<dyn AudioOutput> + Send,
{
    fn create(&mut self) -> Box<dyn AudioOutput> {
        self()
    }
}
