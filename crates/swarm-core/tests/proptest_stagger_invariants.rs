//! Property-based invariants for progress-space staggering.
//!
//! 1. Local progress is always clamped to [0, 1].
//! 2. Local progress is monotone in global progress for a fixed delay.
//! 3. Every delay below the limit arrives at global = 1.
//! 4. Eased progress keeps the same ordering as raw progress.

use proptest::prelude::*;
use swarm_core::animation::stagger::{MAX_STAGGER_LIMIT, Stagger, local_progress};

proptest! {
    #[test]
    fn local_progress_is_clamped(global in -2.0f32..3.0, delay in -1.0f32..2.0) {
        let v = local_progress(global, delay);
        prop_assert!((0.0..=1.0).contains(&v), "local {} out of range", v);
    }

    #[test]
    fn local_progress_is_monotone(a in 0.0f32..=1.0, b in 0.0f32..=1.0, seed in 0.0f32..1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let stagger = Stagger::new(0.3);
        prop_assert!(
            stagger.local(lo, seed) <= stagger.local(hi, seed),
            "local({}) > local({}) for seed {}",
            lo, hi, seed
        );
    }

    #[test]
    fn full_progress_always_arrives(seed in 0.0f32..=1.0, max in 0.0f32..MAX_STAGGER_LIMIT) {
        let stagger = Stagger::new(max);
        prop_assert_eq!(stagger.local(1.0, seed), 1.0);
        prop_assert_eq!(stagger.eased(1.0, seed), 1.0);
    }

    #[test]
    fn easing_preserves_order(a in 0.0f32..=1.0, b in 0.0f32..=1.0, seed in 0.0f32..1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let stagger = Stagger::default();
        prop_assert!(stagger.eased(lo, seed) <= stagger.eased(hi, seed) + 1e-6);
    }
}
