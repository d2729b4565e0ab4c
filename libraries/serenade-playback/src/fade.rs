//! Time-based volume fades
//!
//! Every volume change the engine makes goes through a [`Fade`]:
//! - `EaseInOutQuad`: slow-fast-slow, used for play, pause, volume and crossfade-in
//! - `Linear`: plain time fraction, used only for the crossfade-out ramp

use std::time::{Duration, Instant};

/// Below this distance a fade is applied instantly
const MIN_FADE_DELTA: f32 = 0.0001;

/// Fade curve type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeCurve {
    /// Straight time fraction
    Linear,

    /// Quadratic ease-in-out: `2p²` for the first half, `1 - 2(1-p)²` after
    #[default]
    EaseInOutQuad,
}

impl FadeCurve {
    /// Remap a progress value (clamped to 0.0..=1.0)
    #[inline]
    pub fn apply(&self, progress: f32) -> f32 {
        let p = progress.clamp(0.0, 1.0);

        match self {
            FadeCurve::Linear => p,
            FadeCurve::EaseInOutQuad => {
                if p < 0.5 {
                    2.0 * p * p
                } else {
                    let q = 1.0 - p;
                    1.0 - 2.0 * q * q
                }
            }
        }
    }
}

/// Fade state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    /// Still moving towards the target
    Active,

    /// Reached the target, volume is exact
    Completed,
}

/// A single volume ramp from a start level to a target level
///
/// The start level is captured when the fade is created, so a fade that
/// replaces another one continues from whatever was audible at that moment.
#[derive(Debug, Clone)]
pub struct Fade {
    start: f32,
    target: f32,
    started_at: Instant,
    duration: Duration,
    curve: FadeCurve,
    state: FadeState,
}

impl Fade {
    /// Create a fade starting now from `start`
    pub fn new(start: f32, target: f32, duration: Duration, curve: FadeCurve, now: Instant) -> Self {
        let start = start.clamp(0.0, 1.0);
        let target = target.clamp(0.0, 1.0);
        let state = if (target - start).abs() < MIN_FADE_DELTA || duration.is_zero() {
            FadeState::Completed
        } else {
            FadeState::Active
        };

        Self {
            start,
            target,
            started_at: now,
            duration,
            curve,
            state,
        }
    }

    /// Fade progress (0.0 to 1.0) at `now`
    pub fn progress(&self, now: Instant) -> f32 {
        if self.state == FadeState::Completed {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Advance to `now` and return the volume to apply
    ///
    /// Once progress reaches 1 the fade is completed and returns the target exactly.
    pub fn step(&mut self, now: Instant) -> f32 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            self.state = FadeState::Completed;
            return self.target;
        }

        let eased = self.curve.apply(progress);
        (self.start + (self.target - self.start) * eased).clamp(0.0, 1.0)
    }

    pub fn state(&self) -> FadeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == FadeState::Active
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_curve_linear() {
        let curve = FadeCurve::Linear;
        assert!((curve.apply(0.0) - 0.0).abs() < 0.001);
        assert!((curve.apply(0.25) - 0.25).abs() < 0.001);
        assert!((curve.apply(1.0) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_fade_curve_ease_in_out() {
        let curve = FadeCurve::EaseInOutQuad;

        assert!((curve.apply(0.0) - 0.0).abs() < 0.001);
        assert!((curve.apply(0.25) - 0.125).abs() < 0.001);
        assert!((curve.apply(0.5) - 0.5).abs() < 0.001);
        assert!((curve.apply(0.75) - 0.875).abs() < 0.001);
        assert!((curve.apply(1.0) - 1.0).abs() < 0.001);

        // Out of range input is clamped
        assert_eq!(curve.apply(-1.0), 0.0);
        assert_eq!(curve.apply(2.0), 1.0);
    }

    #[test]
    fn test_fade_reaches_target_exactly() {
        let t0 = Instant::now();
        let mut fade = Fade::new(0.0, 0.8, Duration::from_millis(700), FadeCurve::EaseInOutQuad, t0);

        assert!(fade.is_active());
        let mid = fade.step(t0 + Duration::from_millis(350));
        assert!((mid - 0.4).abs() < 0.01, "midpoint was {}", mid);

        let end = fade.step(t0 + Duration::from_millis(700));
        assert_eq!(end, 0.8);
        assert_eq!(fade.state(), FadeState::Completed);
    }

    #[test]
    fn test_fade_tiny_delta_completes_immediately() {
        let t0 = Instant::now();
        let mut fade = Fade::new(0.5, 0.50005, Duration::from_millis(400), FadeCurve::EaseInOutQuad, t0);
        assert_eq!(fade.state(), FadeState::Completed);
        assert_eq!(fade.step(t0), 0.50005);
    }

    #[test]
    fn test_fade_clamps_out_of_range_levels() {
        let t0 = Instant::now();
        let mut fade = Fade::new(1.4, -0.2, Duration::from_millis(100), FadeCurve::Linear, t0);
        let v = fade.step(t0 + Duration::from_millis(10));
        assert!((0.0..=1.0).contains(&v));
        assert_eq!(fade.step(t0 + Duration::from_millis(100)), 0.0);
    }

    #[test]
    fn test_progress_before_start_is_zero() {
        let t0 = Instant::now();
        let fade = Fade::new(0.0, 1.0, Duration::from_millis(100), FadeCurve::Linear, t0 + Duration::from_millis(50));
        assert_eq!(fade.progress(t0), 0.0);
    }
}
