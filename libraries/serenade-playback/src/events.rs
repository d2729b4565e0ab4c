//! Player Events
//!
//! Event-based communication with the view (toggle button, track label,
//! track list, volume slider, autoplay notice). Events are queued by the
//! engine and drained by whoever renders the page.

use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Play/pause state changed (the toggle button follows this)
    StateChanged {
        /// Whether the engine now considers itself playing
        playing: bool,
    },

    /// The selected track changed
    TrackChanged {
        /// Index into the playlist
        index: usize,
        title: String,
        artist: String,
    },

    /// Outgoing track started its ramp to silence
    CrossfadeStarted {
        /// Index of the outgoing track
        from_index: usize,
        /// Index of the incoming track
        to_index: usize,
        /// Duration of the crossfade in milliseconds
        duration_ms: u64,
    },

    /// Outgoing track reached silence and was stopped
    CrossfadeCompleted,

    /// The user-selected volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
    },

    /// The "tap to enable audio" notice should be shown or hidden
    AutoplayNotice {
        visible: bool,
    },

    /// The platform refused to start audio
    PlaybackBlocked {
        reason: String,
    },

    /// Output was stopped after a pause fade
    OutputStopped,
}

impl PlayerEvent {
    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            PlayerEvent::StateChanged { .. } => "state_changed",
            PlayerEvent::TrackChanged { .. } => "track_changed",
            PlayerEvent::CrossfadeStarted { .. } => "crossfade_started",
            PlayerEvent::CrossfadeCompleted => "crossfade_completed",
            PlayerEvent::VolumeChanged { .. } => "volume_changed",
            PlayerEvent::AutoplayNotice { .. } => "autoplay_notice",
            PlayerEvent::PlaybackBlocked { .. } => "playback_blocked",
            PlayerEvent::OutputStopped => "output_stopped",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_variant_tag() {
        let event = PlayerEvent::StateChanged { playing: true };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"StateChanged":{"playing":true}}"#);

        let back: PlayerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(PlayerEvent::CrossfadeCompleted.name(), "crossfade_completed");
        assert_eq!(
            PlayerEvent::AutoplayNotice { visible: false }.name(),
            "autoplay_notice"
        );
    }
}
