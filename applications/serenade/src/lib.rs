//! Serenade Application Library
//!
//! Configuration, simulated audio outputs and the scripted page session
//! behind the `serenade` command.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod output;
pub mod session;

// Re-export commonly used types for convenience
pub use config::{ContentSettings, FadeSettings, PlayerSettings, SiteConfig};
pub use error::{AppError, Result};
pub use output::{AutoplayGate, SimulatedOutput, SimulatedOutputFactory};
pub use session::{
    default_script, read_message_file, render_photo_file, run_session, LoggingParallax,
    SessionOptions, SessionSummary, VisitorAction,
};
