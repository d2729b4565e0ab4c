//! Message carousel
//!
//! Shows one message at a time. Changing slides is a timed sequence:
//! 1. The old slide is marked leaving and the container height is frozen
//!    to its measured height
//! 2. After the swap delay the old slide is replaced by the new one (entering)
//!    and the container height targets the new slide's height
//! 3. After the settle delay the forced height is cleared and the slide is active
//!
//! Navigation requests during a transition are rejected, not queued.

use crate::messages::Message;
use std::time::{Duration, Instant};
use tracing::debug;

/// Text shown when there are no messages
pub const PLACEHOLDER_TEXT: &str = "Messages are on their way.";

/// Transition timings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTimings {
    /// Fade-out of the old slide before it is removed
    pub swap: Duration,
    /// Height animation and fade-in of the new slide
    pub settle: Duration,
}

impl Default for CarouselTimings {
    fn default() -> Self {
        Self {
            swap: Duration::from_millis(430),
            settle: Duration::from_millis(600),
        }
    }
}

/// What a slide shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideContent {
    Message(Message),
    Placeholder,
}

impl SlideContent {
    pub fn text(&self) -> &str {
        match self {
            SlideContent::Message(message) => &message.text,
            SlideContent::Placeholder => PLACEHOLDER_TEXT,
        }
    }
}

/// Transition class of a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideState {
    Entering,
    Active,
    Leaving,
}

/// The slide currently in the stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub content: SlideContent,
    pub state: SlideState,
}

/// One navigation dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    pub index: usize,
    pub active: bool,
}

/// Measures rendered slide heights in pixels
pub trait SlideLayout {
    fn measure(&self, content: &SlideContent) -> f32;
}

impl<F> SlideLayout for F
where
    F: Fn(&SlideContent) -> f32,
{
    fn measure(&self, content: &SlideContent) -> f32 {
        self(content)
    }
}

/// Height estimate from wrapped text length
#[derive(Debug, Clone)]
pub struct TextBlockLayout {
    /// Characters per rendered line
    pub chars_per_line: usize,
    pub line_height: f32,
    /// Vertical padding around the text
    pub padding: f32,
}

impl Default for TextBlockLayout {
    fn default() -> Self {
        Self {
            chars_per_line: 48,
            line_height: 28.0,
            padding: 48.0,
        }
    }
}

impl SlideLayout for TextBlockLayout {
    fn measure(&self, content: &SlideContent) -> f32 {
        let chars = content.text().chars().count();
        let per_line = self.chars_per_line.max(1);
        let mut lines = chars.div_ceil(per_line).max(1);

        // Signature / date line
        if let SlideContent::Message(message) = content {
            if !message.from.is_empty() || message.timestamp.is_some() {
                lines += 1;
            }
        }

        lines as f32 * self.line_height + self.padding
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    FadingOut { swap_at: Instant },
    Settling { done_at: Instant },
}

/// Carousel state machine
pub struct Carousel<L: SlideLayout = TextBlockLayout> {
    messages: Vec<Message>,
    index: usize,
    stage: Slide,
    container_height: Option<f32>,
    phase: Phase,
    layout: L,
    timings: CarouselTimings,
}

impl<L: SlideLayout> Carousel<L> {
    /// Create a carousel showing the first message (or the placeholder)
    pub fn new(messages: Vec<Message>, layout: L) -> Self {
        let content = messages
            .first()
            .cloned()
            .map(SlideContent::Message)
            .unwrap_or(SlideContent::Placeholder);

        Self {
            messages,
            index: 0,
            stage: Slide {
                content,
                state: SlideState::Active,
            },
            container_height: None,
            phase: Phase::Idle,
            layout,
            timings: CarouselTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: CarouselTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Next button
    pub fn next(&mut self, now: Instant) -> bool {
        self.go_to(self.index as i64 + 1, now)
    }

    /// Previous button
    pub fn prev(&mut self, now: Instant) -> bool {
        self.go_to(self.index as i64 - 1, now)
    }

    /// Dot click (any integer, wrapped modulo the message count)
    ///
    /// Returns `false` without changing anything while a transition is
    /// running, when there are no messages, or when the target is already shown.
    pub fn go_to(&mut self, index: i64, now: Instant) -> bool {
        if self.is_animating() {
            debug!("Carousel busy, ignoring navigation to {}", index);
            return false;
        }
        if self.messages.is_empty() {
            return false;
        }

        let target = index.rem_euclid(self.messages.len() as i64) as usize;
        if target == self.index {
            return false;
        }

        // Freeze the container at the outgoing slide's height
        self.container_height = Some(self.layout.measure(&self.stage.content));
        self.stage.state = SlideState::Leaving;
        self.index = target;
        self.phase = Phase::FadingOut {
            swap_at: now + self.timings.swap,
        };

        debug!("Carousel moving to message {}", target);
        true
    }

    /// Advance the transition to `now`
    pub fn tick(&mut self, now: Instant) {
        if let Phase::FadingOut { swap_at } = self.phase {
            if now < swap_at {
                return;
            }
            let content = SlideContent::Message(self.messages[self.index].clone());
            self.container_height = Some(self.layout.measure(&content));
            self.stage = Slide {
                content,
                state: SlideState::Entering,
            };
            self.phase = Phase::Settling {
                done_at: swap_at + self.timings.settle,
            };
        }

        if let Phase::Settling { done_at } = self.phase {
            if now >= done_at {
                self.container_height = None;
                self.stage.state = SlideState::Active;
                self.phase = Phase::Idle;
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Index of the selected message
    pub fn index(&self) -> usize {
        self.index
    }

    /// The single slide currently in the stage
    pub fn stage(&self) -> &Slide {
        &self.stage
    }

    /// Forced container height in pixels, `None` when the height is natural
    pub fn container_height(&self) -> Option<f32> {
        self.container_height
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_placeholder(&self) -> bool {
        self.stage.content == SlideContent::Placeholder
    }

    /// Dot indicators; none for an empty carousel
    pub fn dots(&self) -> Vec<Dot> {
        (0..self.messages.len())
            .map(|index| Dot {
                index,
                active: index == self.index,
            })
            .collect()
    }
}
