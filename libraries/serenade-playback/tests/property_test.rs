//! Property-based tests for the playback engine
//!
//! Uses proptest to verify invariants across many random inputs.

mod common;

use common::{engine_with, OutputRegistry};
use proptest::prelude::*;
use serenade_playback::{Fade, FadeCurve, Playlist, Track};
use std::time::{Duration, Instant};

// ===== Helpers =====

fn arbitrary_playlist() -> impl Strategy<Value = Playlist> {
    prop::collection::vec(("[a-z]{1,8}", "[A-Za-z ]{1,20}"), 1..20).prop_map(|entries| {
        let tracks = entries
            .into_iter()
            .map(|(file, title)| Track::new(format!("music/{}.mp3", file), title, "Artist"))
            .collect();
        Playlist::new(tracks).unwrap()
    })
}

// ===== Property Tests =====

proptest! {
    /// Property: a fade always lands exactly on its target once its duration has elapsed
    #[test]
    fn fade_converges_to_target(
        start in 0.0f32..=1.0,
        target in 0.0f32..=1.0,
        duration_ms in 1u64..5000,
        extra_ms in 0u64..1000,
        linear in any::<bool>(),
    ) {
        let curve = if linear { FadeCurve::Linear } else { FadeCurve::EaseInOutQuad };
        let t0 = Instant::now();
        let mut fade = Fade::new(start, target, Duration::from_millis(duration_ms), curve, t0);

        let end = t0 + Duration::from_millis(duration_ms + extra_ms);
        prop_assert_eq!(fade.step(end), target);
        prop_assert!(!fade.is_active());
    }

    /// Property: fade output never leaves 0..=1 and never overshoots its endpoints
    #[test]
    fn fade_stays_between_endpoints(
        start in 0.0f32..=1.0,
        target in 0.0f32..=1.0,
        samples in prop::collection::vec(0u64..2000, 1..50),
    ) {
        let t0 = Instant::now();
        let mut fade = Fade::new(start, target, Duration::from_millis(1000), FadeCurve::EaseInOutQuad, t0);
        let (lo, hi) = if start < target { (start, target) } else { (target, start) };

        let mut sorted = samples;
        sorted.sort_unstable();
        for ms in sorted {
            let v = fade.step(t0 + Duration::from_millis(ms));
            prop_assert!((0.0..=1.0).contains(&v));
            prop_assert!(v >= lo - 1e-6 && v <= hi + 1e-6, "{} outside [{}, {}]", v, lo, hi);
        }
    }

    /// Property: any integer index maps to ((i % n) + n) % n
    #[test]
    fn wrap_index_matches_modulo_formula(
        playlist in arbitrary_playlist(),
        index in -10_000i64..10_000,
    ) {
        let n = playlist.len() as i64;
        let expected = (((index % n) + n) % n) as usize;
        prop_assert_eq!(playlist.wrap_index(index), expected);
        prop_assert_eq!(playlist.wrap_index(index + n), expected);
    }

    /// Property: load_track(current + N) selects the current track again
    #[test]
    fn load_track_full_cycle_is_identity(
        index in -50i64..50,
    ) {
        let registry = OutputRegistry::new(true);
        let mut engine = engine_with(&registry, 50);
        let now = Instant::now();

        engine.load_track(index, now);
        let current = engine.current_index();
        prop_assert!(current < 3);

        engine.load_track(current as i64 + 3, now);
        prop_assert_eq!(engine.current_index(), current);
    }

    /// Property: live output volume stays clamped through arbitrary control sequences
    #[test]
    fn control_sequences_keep_state_valid(
        operations in prop::collection::vec((0u8..6, 0u8..=100, 1u64..400), 1..40),
    ) {
        let registry = OutputRegistry::new(true);
        let mut engine = engine_with(&registry, 70);
        let mut now = Instant::now();
        engine.start(now);

        for (op, value, gap_ms) in operations {
            match op {
                0 => { let _ = engine.play(now); }
                1 => engine.pause(now),
                2 => engine.next_track(now),
                3 => engine.set_volume(value, now),
                4 => engine.load_track(i64::from(value) - 50, now),
                _ => engine.on_track_ended(now),
            }
            now += Duration::from_millis(gap_ms);
            engine.tick(now);

            let volume = engine.output_volume();
            prop_assert!((0.0..=1.0).contains(&volume));
            prop_assert!(engine.current_index() < 3);
            if let Some(out) = engine.fading_out_volume() {
                prop_assert!((0.0..=1.0).contains(&out));
            }
        }

        // Everything settles once the longest transition has elapsed
        now += Duration::from_millis(2000);
        engine.tick(now);
        prop_assert!(!engine.is_crossfading());
        prop_assert!(!engine.is_fading());
    }
}
