#![forbid(unsafe_code)]

//! Easing curves and small time-based animations.
//!
//! Scroll-driven effects in this workspace are stateless functions of a
//! progress scalar, so most of this module is plain easing math. The
//! [`Animation`] trait covers the few effects that are driven by wall-clock
//! time instead (the stat counters).

pub mod stagger;

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    clamp_unit(t)
}

/// Cubic ease-out. Used by the stat counters.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = clamp_unit(t);
    1.0 - (1.0 - t).powi(3)
}

/// Hermite smoothstep `t²(3 − 2t)`, zero slope at both ends.
#[inline]
pub fn smooth(t: f32) -> f32 {
    let t = clamp_unit(t);
    t * t * (3.0 - 2.0 * t)
}

/// Clamp into [0, 1]. NaN maps to 0 so a bad scroll sample cannot poison a
/// whole frame.
#[inline]
pub fn clamp_unit(t: f32) -> f32 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Linear ramp: 0 at `edge0`, 1 at `edge1`, clamped outside.
///
/// A degenerate ramp (`edge1 <= edge0`) acts as a step at `edge0`.
#[inline]
pub fn ramp(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x >= edge0 { 1.0 } else { 0.0 };
    }
    clamp_unit((x - edge0) / (edge1 - edge0))
}

/// GLSL-style `smoothstep(edge0, edge1, x)`.
///
/// Reversed edges are allowed (`smoothstep(0.2, 0.0, d)` falls from 1 to 0),
/// matching the shader convention used for sprite highlights.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    smooth((x - edge0) / (edge1 - edge0))
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progression from 0.0 to 1.0 over a duration, with configurable easing.
///
/// Elapsed time is accumulated as a [`Duration`] so long runs do not drift.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a fade with the given duration and linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Raw linear progress (before easing), in [0.0, 1.0].
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        clamp_unit(t as f32)
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// CountUp
// ---------------------------------------------------------------------------

/// Default duration of a stat counter run.
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(2000);

/// Animated integer counter (0 → `target`) with a cubic ease-out.
///
/// The counter only runs while its element is visible: call
/// [`CountUp::set_visible`] from the visibility observer. Leaving view resets
/// the display to zero so the count replays on the next entry.
#[derive(Debug, Clone, Copy)]
pub struct CountUp {
    target: u32,
    fade: Fade,
    visible: bool,
}

impl CountUp {
    /// Counter towards `target` over [`COUNT_UP_DURATION`].
    pub fn new(target: u32) -> Self {
        Self::with_duration(target, COUNT_UP_DURATION)
    }

    /// Counter towards `target` over a custom duration.
    pub fn with_duration(target: u32, duration: Duration) -> Self {
        Self {
            target,
            fade: Fade::new(duration).easing(ease_out_cubic),
            visible: false,
        }
    }

    /// Update visibility. Entering view restarts from zero.
    pub fn set_visible(&mut self, visible: bool) {
        if visible != self.visible {
            self.fade.reset();
        }
        self.visible = visible;
    }

    /// Whether the counter is currently in view.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The number to display right now.
    pub fn display(&self) -> u32 {
        if !self.visible {
            return 0;
        }
        (self.fade.value() * self.target as f32).round() as u32
    }

    /// Final value.
    pub fn target(&self) -> u32 {
        self.target
    }
}

impl Animation for CountUp {
    fn tick(&mut self, dt: Duration) {
        if self.visible {
            self.fade.tick(dt);
        }
    }

    fn is_complete(&self) -> bool {
        self.visible && self.fade.is_complete()
    }

    fn value(&self) -> f32 {
        if self.visible { self.fade.value() } else { 0.0 }
    }

    fn reset(&mut self) {
        self.fade.reset();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_endpoints_and_midpoint() {
        assert_eq!(smooth(0.0), 0.0);
        assert_eq!(smooth(1.0), 1.0);
        assert!((smooth(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn clamp_unit_maps_nan_to_zero() {
        assert_eq!(clamp_unit(f32::NAN), 0.0);
        assert_eq!(clamp_unit(-3.0), 0.0);
        assert_eq!(clamp_unit(7.0), 1.0);
    }

    #[test]
    fn ramp_clamps_outside_edges() {
        assert_eq!(ramp(0.2, 0.4, 0.1), 0.0);
        assert_eq!(ramp(0.2, 0.4, 0.5), 1.0);
        assert!((ramp(0.2, 0.4, 0.3) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn degenerate_ramp_is_a_step() {
        assert_eq!(ramp(0.5, 0.5, 0.49), 0.0);
        assert_eq!(ramp(0.5, 0.5, 0.5), 1.0);
    }

    #[test]
    fn smoothstep_reversed_edges_fall() {
        assert_eq!(smoothstep(0.2, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(0.2, 0.0, 0.3), 0.0);
        assert!(smoothstep(0.2, 0.0, 0.05) > smoothstep(0.2, 0.0, 0.15));
    }

    #[test]
    fn fade_reaches_one() {
        let mut fade = Fade::new(Duration::from_millis(100));
        fade.tick(Duration::from_millis(100));
        assert!(fade.is_complete());
        assert_eq!(fade.value(), 1.0);
    }

    #[test]
    fn zero_duration_fade_completes_immediately() {
        let mut fade = Fade::new(Duration::ZERO);
        fade.tick(Duration::from_nanos(1));
        assert!(fade.is_complete());
    }

    #[test]
    fn count_up_hidden_shows_zero() {
        let mut counter = CountUp::new(98);
        counter.tick(Duration::from_secs(5));
        assert_eq!(counter.display(), 0);
    }

    #[test]
    fn count_up_reaches_target() {
        let mut counter = CountUp::new(120);
        counter.set_visible(true);
        counter.tick(Duration::from_millis(2000));
        assert!(counter.is_complete());
        assert_eq!(counter.display(), 120);
    }

    #[test]
    fn count_up_is_ahead_of_linear_midway() {
        let mut counter = CountUp::new(100);
        counter.set_visible(true);
        counter.tick(Duration::from_millis(1000));
        // 1 - 0.5^3 = 0.875
        assert_eq!(counter.display(), 88);
    }

    #[test]
    fn count_up_replays_after_leaving_view() {
        let mut counter = CountUp::new(50);
        counter.set_visible(true);
        counter.tick(Duration::from_secs(3));
        assert_eq!(counter.display(), 50);
        counter.set_visible(false);
        assert_eq!(counter.display(), 0);
        counter.set_visible(true);
        assert_eq!(counter.display(), 0);
        counter.tick(Duration::from_secs(3));
        assert_eq!(counter.display(), 50);
    }
}
