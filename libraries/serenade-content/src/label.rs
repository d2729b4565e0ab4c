//! Track label text transition
//!
//! Changing the title or artist fades the old text out (opacity 0, nudged
//! down 4px), swaps the text once it is invisible, then fades back in.

use std::time::{Duration, Instant};

/// Shown when a track has no artist
pub const EMPTY_ARTIST: &str = "—";

/// Delay between starting the fade-out and swapping the text
pub const TEXT_SWAP_DELAY: Duration = Duration::from_millis(250);

/// CSS transition the label element carries
pub const LABEL_TRANSITION: &str = "opacity .45s ease, transform .45s ease";

/// Target style of the label; the CSS transition animates towards it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub opacity: f32,
    pub translate_y_px: f32,
}

impl LabelStyle {
    const HIDDEN: Self = Self {
        opacity: 0.0,
        translate_y_px: 4.0,
    };

    const SHOWN: Self = Self {
        opacity: 1.0,
        translate_y_px: 0.0,
    };
}

/// One text element with a fade-out / swap / fade-in transition
#[derive(Debug, Clone, Default)]
pub struct TextFade {
    text: String,
    incoming: Option<(String, Instant)>,
}

impl TextFade {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            incoming: None,
        }
    }

    /// Start changing to `text`; a newer change replaces a pending one
    pub fn set(&mut self, text: impl Into<String>, now: Instant) {
        self.incoming = Some((text.into(), now + TEXT_SWAP_DELAY));
    }

    /// Swap the text once the fade-out delay has passed
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, swap_at)) = &self.incoming {
            if now >= *swap_at {
                if let Some((text, _)) = self.incoming.take() {
                    self.text = text;
                }
            }
        }
    }

    /// Text currently in the element
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_transitioning(&self) -> bool {
        self.incoming.is_some()
    }

    pub fn style(&self) -> LabelStyle {
        if self.incoming.is_some() {
            LabelStyle::HIDDEN
        } else {
            LabelStyle::SHOWN
        }
    }
}

/// Title and artist lines of the player bar
#[derive(Debug, Clone, Default)]
pub struct TrackLabel {
    pub title: TextFade,
    pub artist: TextFade,
}

impl TrackLabel {
    /// Transition both lines to a new track
    pub fn show_track(&mut self, title: &str, artist: &str, now: Instant) {
        self.title.set(title, now);
        let artist = if artist.is_empty() { EMPTY_ARTIST } else { artist };
        self.artist.set(artist, now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.title.tick(now);
        self.artist.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_text_after_delay() {
        let t0 = Instant::now();
        let mut fade = TextFade::new("Perfect");

        fade.set("All of Me", t0);
        assert_eq!(fade.text(), "Perfect");
        assert_eq!(fade.style(), LabelStyle::HIDDEN);

        fade.tick(t0 + Duration::from_millis(249));
        assert_eq!(fade.text(), "Perfect");

        fade.tick(t0 + Duration::from_millis(250));
        assert_eq!(fade.text(), "All of Me");
        assert_eq!(fade.style(), LabelStyle::SHOWN);
        assert!(!fade.is_transitioning());
    }

    #[test]
    fn latest_change_wins() {
        let t0 = Instant::now();
        let mut fade = TextFade::new("A");
        fade.set("B", t0);
        fade.set("C", t0 + Duration::from_millis(100));

        fade.tick(t0 + Duration::from_millis(300));
        assert_eq!(fade.text(), "A");
        fade.tick(t0 + Duration::from_millis(350));
        assert_eq!(fade.text(), "C");
    }

    #[test]
    fn empty_artist_shows_dash() {
        let t0 = Instant::now();
        let mut label = TrackLabel::default();
        label.show_track("Untitled", "", t0);
        label.tick(t0 + TEXT_SWAP_DELAY);
        assert_eq!(label.title.text(), "Untitled");
        assert_eq!(label.artist.text(), EMPTY_ARTIST);
    }
}
