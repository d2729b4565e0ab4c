/// Content error types
use thiserror::Error;

/// Result type alias using `ContentError`
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors raised while reading page content
///
/// Loaders log these and fall back to an empty render; they never reach
/// the visitor.
#[derive(Error, Debug)]
pub enum ContentError {
    /// Manifest JSON did not have an accepted shape
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Optional page effect failed to start
    #[error("Effect initialization failed: {0}")]
    EffectInit(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
