//! Error types for the playback engine

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The platform refused to start audio (typically no user gesture yet)
    #[error("Playback blocked: {0}")]
    Blocked(String),

    /// Playlist has no tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Audio output error
    #[error("Audio output error: {0}")]
    Output(String),

    /// Preference storage error
    #[error("Preference store error: {0}")]
    Preference(String),

    /// The player task is gone
    #[error("Player task is not running")]
    PlayerGone,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl PlaybackError {
    /// Whether this error is the expected "needs a user gesture" refusal
    pub fn is_blocked(&self) -> bool {
        matches!(self, PlaybackError::Blocked(_))
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
