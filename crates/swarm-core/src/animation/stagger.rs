#![forbid(unsafe_code)]

//! Progress-space stagger: per-item delays applied to a shared progress value.
//!
//! A swarm of particles shares one global morph factor, but each particle
//! starts moving a little later than the last. Instead of time offsets, the
//! delay lives in progress space: an item with delay `d` sees
//!
//! ```text
//! local = clamp((global - d) / (1 - d), 0, 1)
//! ```
//!
//! # Invariants
//!
//! 1. `local` is always in [0, 1], for any input including NaN.
//! 2. For a fixed delay, `local` is monotonically non-decreasing in `global`.
//! 3. `global >= 1` gives `local == 1` for every delay below 1, so every item
//!    arrives by the end of the shared ramp.
//! 4. `global <= d` gives `local == 0`.
//!
//! # Failure Modes
//!
//! - Delays at or above 1 would never arrive; [`Stagger::new`] clamps the
//!   maximum below [`MAX_STAGGER_LIMIT`].

use super::{clamp_unit, smooth};

/// Largest usable maximum delay.
pub const MAX_STAGGER_LIMIT: f32 = 0.99;

/// Maps a per-item seed in [0, 1) to a progress-space delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagger {
    max_delay: f32,
}

impl Stagger {
    /// Create a stagger whose largest delay is `max_delay`.
    #[must_use]
    pub fn new(max_delay: f32) -> Self {
        let max_delay = if max_delay.is_nan() {
            0.0
        } else {
            max_delay.clamp(0.0, MAX_STAGGER_LIMIT)
        };
        Self { max_delay }
    }

    /// Largest delay this stagger can produce.
    #[must_use]
    pub fn max_delay(self) -> f32 {
        self.max_delay
    }

    /// Delay for an item with the given seed.
    #[inline]
    #[must_use]
    pub fn delay(self, seed: f32) -> f32 {
        clamp_unit(seed) * self.max_delay
    }

    /// Local (un-eased) progress for an item.
    #[inline]
    #[must_use]
    pub fn local(self, global: f32, seed: f32) -> f32 {
        local_progress(global, self.delay(seed))
    }

    /// Local progress passed through smoothstep.
    #[inline]
    #[must_use]
    pub fn eased(self, global: f32, seed: f32) -> f32 {
        smooth(self.local(global, seed))
    }
}

impl Default for Stagger {
    fn default() -> Self {
        Self::new(0.3)
    }
}

/// Local progress for an item delayed by `delay` (see module docs).
#[inline]
#[must_use]
pub fn local_progress(global: f32, delay: f32) -> f32 {
    let delay = if delay.is_nan() {
        0.0
    } else {
        delay.clamp(0.0, MAX_STAGGER_LIMIT)
    };
    clamp_unit((global - delay) / (1.0 - delay))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
