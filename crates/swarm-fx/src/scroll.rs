#![forbid(unsafe_code)]

//! Scroll observation math.
//!
//! [`scroll_progress`] turns an element rect into the section progress scalar
//! the effects consume: 0 when the element's top edge meets the bottom of the
//! viewport, 1 when its bottom edge leaves through the top.
//!
//! [`Keyframes`] is a piecewise-linear transform over that scalar, used for
//! the section content fades that run alongside the particles.

use std::fmt;

use swarm_core::animation::clamp_unit;

/// Progress of an element scrolling through the viewport.
///
/// `top` is the element's top edge relative to the viewport top (negative
/// once it has scrolled past), `height` its height, all in CSS px.
#[must_use]
pub fn scroll_progress(top: f32, height: f32, viewport_height: f32) -> f32 {
    let travel = viewport_height + height;
    if !(travel > 0.0) {
        return 0.0;
    }
    clamp_unit((viewport_height - top) / travel)
}

// ---------------------------------------------------------------------------
// Keyframes
// ---------------------------------------------------------------------------

/// Why a keyframe table was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyframeError {
    /// No stops at all.
    Empty,
    /// Stop and value tables differ in length.
    LengthMismatch { stops: usize, values: usize },
    /// Stop `index` is smaller than the one before it.
    NotAscending { index: usize },
    /// Stop or value `index` is NaN or infinite.
    NonFinite { index: usize },
}

impl fmt::Display for KeyframeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "keyframes need at least one stop"),
            Self::LengthMismatch { stops, values } => {
                write!(f, "{stops} stops but {values} values")
            }
            Self::NotAscending { index } => write!(f, "stop {index} is out of order"),
            Self::NonFinite { index } => write!(f, "keyframe {index} is not finite"),
        }
    }
}

impl std::error::Error for KeyframeError {}

/// Piecewise-linear map from progress to a value, clamped at both ends.
///
/// Always holds at least one finite stop; [`Keyframes::new`] is the only
/// public way in.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes {
    stops: Vec<f32>,
    values: Vec<f32>,
}

impl Keyframes {
    /// Build from ascending stops and matching values.
    pub fn new(stops: Vec<f32>, values: Vec<f32>) -> Result<Self, KeyframeError> {
        if stops.is_empty() {
            return Err(KeyframeError::Empty);
        }
        if stops.len() != values.len() {
            return Err(KeyframeError::LengthMismatch {
                stops: stops.len(),
                values: values.len(),
            });
        }
        for (index, (s, v)) in stops.iter().zip(&values).enumerate() {
            if !s.is_finite() || !v.is_finite() {
                return Err(KeyframeError::NonFinite { index });
            }
            if index > 0 && *s < stops[index - 1] {
                return Err(KeyframeError::NotAscending { index });
            }
        }
        Ok(Self { stops, values })
    }

    /// Value at `x`. NaN samples the first keyframe.
    #[must_use]
    pub fn sample(&self, x: f32) -> f32 {
        let last = self.stops.len() - 1;
        if x.is_nan() || x <= self.stops[0] {
            return self.values[0];
        }
        if x >= self.stops[last] {
            return self.values[last];
        }
        // First stop strictly greater than x; at least 1 and at most `last`.
        let hi = self.stops.partition_point(|&s| s <= x);
        let lo = hi - 1;
        let span = self.stops[hi] - self.stops[lo];
        if span <= 0.0 {
            return self.values[hi];
        }
        let t = (x - self.stops[lo]) / span;
        self.values[lo] + (self.values[hi] - self.values[lo]) * t
    }

    pub fn stops(&self) -> &[f32] {
        &self.stops
    }
}

// ---------------------------------------------------------------------------
// Content transforms
// ---------------------------------------------------------------------------

/// Visual transform for a block of section content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentTransform {
    pub opacity: f32,
    /// Vertical offset in CSS px (positive is down).
    pub offset_y: f32,
    /// Blur radius in CSS px.
    pub blur: f32,
}

impl ContentTransform {
    /// Fully visible, no offset, no blur.
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
        blur: 0.0,
    };
}

/// Keyframed content transform driven by section progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentKeyframes {
    opacity: Keyframes,
    offset_y: Keyframes,
    blur: Keyframes,
}

const HEADING_STOPS: [f32; 6] = [0.0, 0.36, 0.42, 0.56, 0.60, 1.0];
const REVEAL_STOPS: [f32; 6] = [0.1, 0.3, 0.35, 0.65, 0.7, 0.9];

impl ContentKeyframes {
    /// Content under a particle heading: hidden while the particles spell the
    /// heading, visible around the hand-off, gone before the particles return.
    #[must_use]
    pub fn heading_content() -> Self {
        Self {
            opacity: Keyframes {
                stops: HEADING_STOPS.to_vec(),
                values: vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
            },
            offset_y: Keyframes {
                stops: HEADING_STOPS.to_vec(),
                values: vec![40.0, 40.0, 0.0, 0.0, -20.0, -20.0],
            },
            blur: Keyframes {
                stops: HEADING_STOPS.to_vec(),
                values: vec![0.0; HEADING_STOPS.len()],
            },
        }
    }

    /// Whole-section reveal: rise in with a blur, sit, then rise out.
    #[must_use]
    pub fn section_reveal() -> Self {
        Self {
            opacity: Keyframes {
                stops: REVEAL_STOPS.to_vec(),
                values: vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0],
            },
            offset_y: Keyframes {
                stops: REVEAL_STOPS.to_vec(),
                values: vec![40.0, 0.0, 0.0, 0.0, 0.0, -40.0],
            },
            blur: Keyframes {
                stops: REVEAL_STOPS.to_vec(),
                values: vec![6.0, 0.0, 0.0, 0.0, 0.0, 6.0],
            },
        }
    }

    /// Transform at `progress`. Reduced motion pins the identity.
    #[must_use]
    pub fn at(&self, progress: f32, reduced_motion: bool) -> ContentTransform {
        if reduced_motion {
            return ContentTransform::IDENTITY;
        }
        ContentTransform {
            opacity: clamp_unit(self.opacity.sample(progress)),
            offset_y: self.offset_y.sample(progress),
            blur: self.blur.sample(progress).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_spans_entry_to_exit() {
        // Element just below the viewport.
        assert_eq!(scroll_progress(800.0, 600.0, 800.0), 0.0);
        // Bottom edge just left through the top.
        assert_eq!(scroll_progress(-600.0, 600.0, 800.0), 1.0);
        // Halfway through the combined travel.
        assert!((scroll_progress(100.0, 600.0, 800.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn progress_clamps_and_handles_degenerate_sizes() {
        assert_eq!(scroll_progress(5000.0, 100.0, 800.0), 0.0);
        assert_eq!(scroll_progress(-5000.0, 100.0, 800.0), 1.0);
        assert_eq!(scroll_progress(0.0, 0.0, 0.0), 0.0);
        assert_eq!(scroll_progress(f32::NAN, 100.0, 800.0), 0.0);
    }

    #[test]
    fn keyframes_interpolate_and_clamp() {
        let k = Keyframes::new(vec![0.0, 0.5, 1.0], vec![0.0, 10.0, 0.0]).unwrap();
        assert_eq!(k.sample(-1.0), 0.0);
        assert_eq!(k.sample(0.25), 5.0);
        assert_eq!(k.sample(0.5), 10.0);
        assert_eq!(k.sample(0.75), 5.0);
        assert_eq!(k.sample(2.0), 0.0);
        assert_eq!(k.sample(f32::NAN), 0.0);
    }

    #[test]
    fn repeated_stop_is_a_jump() {
        let k = Keyframes::new(vec![0.0, 0.5, 0.5, 1.0], vec![0.0, 0.0, 1.0, 1.0]).unwrap();
        assert_eq!(k.sample(0.49), 0.0);
        assert_eq!(k.sample(0.5), 1.0);
    }

    #[test]
    fn bad_tables_are_rejected() {
        assert_eq!(Keyframes::new(vec![], vec![]), Err(KeyframeError::Empty));
        assert_eq!(
            Keyframes::new(vec![0.0, 1.0], vec![0.0]),
            Err(KeyframeError::LengthMismatch { stops: 2, values: 1 })
        );
        assert_eq!(
            Keyframes::new(vec![0.5, 0.2], vec![0.0, 1.0]),
            Err(KeyframeError::NotAscending { index: 1 })
        );
        assert_eq!(
            Keyframes::new(vec![0.0, f32::INFINITY], vec![0.0, 1.0]),
            Err(KeyframeError::NonFinite { index: 1 })
        );
        assert_eq!(
            Keyframes::new(vec![0.8, f32::NAN, 0.2], vec![1.0; 3]),
            Err(KeyframeError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn single_stop_is_flat() {
        let k = Keyframes::new(vec![0.5], vec![3.0]).unwrap();
        for x in [-1.0, 0.0, 0.5, 0.7, 2.0, f32::NAN] {
            assert_eq!(k.sample(x), 3.0);
        }
    }

    #[test]
    fn presets_sample_across_the_whole_range() {
        for k in [
            ContentKeyframes::heading_content(),
            ContentKeyframes::section_reveal(),
        ] {
            for i in 0..=100 {
                let t = k.at(i as f32 / 100.0, false);
                assert!((0.0..=1.0).contains(&t.opacity));
                assert!(t.offset_y.is_finite() && t.blur >= 0.0);
            }
        }
    }

    #[test]
    fn heading_content_is_visible_between_handoffs() {
        let k = ContentKeyframes::heading_content();
        assert_eq!(k.at(0.2, false).opacity, 0.0);
        assert_eq!(k.at(0.5, false), ContentTransform::IDENTITY);
        assert_eq!(k.at(0.8, false).offset_y, -20.0);
    }

    #[test]
    fn reduced_motion_pins_identity() {
        let k = ContentKeyframes::section_reveal();
        assert_eq!(k.at(0.0, true), ContentTransform::IDENTITY);
        assert_eq!(k.at(0.0, false).blur, 6.0);
    }
}
