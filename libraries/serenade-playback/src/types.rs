//! Core types for playback management

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single entry of the background playlist
///
/// Defined at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Path or URL of the audio file
    #[serde(rename = "src")]
    pub source: String,

    /// Track title
    pub title: String,

    /// Artist name (may be empty)
    #[serde(default)]
    pub artist: String,
}

impl Track {
    pub fn new(
        source: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }
}

/// Ordered, fixed, non-empty list of tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Create a playlist; an empty track list is rejected
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        Ok(Self { tracks })
    }

    /// Number of tracks (always at least one)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false, kept for API symmetry with slices
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Map any integer (including negative) onto a valid index
    ///
    /// `((index % n) + n) % n`
    pub fn wrap_index(&self, index: i64) -> usize {
        let n = self.tracks.len() as i64;
        index.rem_euclid(n) as usize
    }

    /// Track at a wrapped position
    pub fn get(&self, index: usize) -> &Track {
        &self.tracks[index % self.tracks.len()]
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

impl Default for Playlist {
    /// The three songs the page ships with
    fn default() -> Self {
        Self {
            tracks: vec![
                Track::new("Music/Perfect.mp3", "Perfect", "Ed Sheeran"),
                Track::new(
                    "Music/You Are The Reason.mp3",
                    "You Are The Reason",
                    "Calum Scott",
                ),
                Track::new("Music/All of Me.mp3", "All of Me", "John Legend"),
            ],
        }
    }
}

/// Durations of every volume transition the engine performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FadeTimings {
    /// Fade-in after `play()` succeeds
    pub play: Duration,

    /// Fade-out on `pause()`
    pub pause: Duration,

    /// Delay before the deferred stop after `pause()`
    pub pause_stop: Duration,

    /// Crossfade length (both the incoming and the outgoing ramp)
    pub crossfade: Duration,

    /// Fade applied when the volume slider moves during playback
    pub volume: Duration,

    /// Fade-in of the initial autoplay attempt
    pub autoplay: Duration,
}

impl Default for FadeTimings {
    fn default() -> Self {
        Self {
            play: Duration::from_millis(700),
            pause: Duration::from_millis(600),
            pause_stop: Duration::from_millis(610),
            crossfade: Duration::from_millis(1300),
            volume: Duration::from_millis(400),
            autoplay: Duration::from_millis(1600),
        }
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Volume (0-100) used when no preference is stored (default: 60)
    pub default_volume: u8,

    /// Fade durations
    pub timings: FadeTimings,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume: 60,
            timings: FadeTimings::default(),
        }
    }
}

/// One row of the track list shown in the player bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackListEntry {
    pub index: usize,
    pub title: String,
    pub active: bool,
}
