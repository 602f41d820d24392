#![forbid(unsafe_code)]

//! Text → point cloud sampling.
//!
//! A heading is drawn into a padded box, the coverage bitmap is scanned on a
//! fixed stride, and every foreground sample becomes a point relative to the
//! box center with y pointing up. If the scan finds more points than the
//! particle budget, a uniform subset of exactly `budget` points is kept.
//!
//! # Invariants
//!
//! 1. `points.len() == min(foreground samples, budget)`.
//! 2. Every point satisfies `|x| <= width / 2` and `|y| <= height / 2`.
//! 3. `height == font_size * 1.4 + 2 * padding` whenever measuring succeeds.
//!
//! # Failure Modes
//!
//! A rasterizer error yields [`SampledText::empty`] and a `warn!` event. The
//! sampler never fails its caller.

use std::future::Future;

use glam::Vec2;
use rand::Rng;
use rand::seq::index;

use crate::config::SwarmConfig;
use crate::raster::{FontSpec, TextRasterizer};

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;

/// Scan parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerSettings {
    /// Margin added on every side of the measured text, in px.
    pub padding: f32,
    /// Stride in px on both axes.
    pub step: u32,
    /// Coverage must exceed this to count as foreground.
    pub alpha_threshold: u8,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            padding: 20.0,
            step: 2,
            alpha_threshold: 128,
        }
    }
}

impl From<&SwarmConfig> for SamplerSettings {
    fn from(config: &SwarmConfig) -> Self {
        Self {
            padding: config.padding,
            step: config.sample_step.max(1),
            alpha_threshold: config.alpha_threshold,
        }
    }
}

/// A sampled heading: points centered on the box, plus the box size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampledText {
    pub points: Vec<Vec2>,
    pub width: f32,
    pub height: f32,
}

impl SampledText {
    /// No points and a zero box.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sample `text` into at most `budget` points.
pub fn sample_text<R, G>(
    rasterizer: &mut R,
    text: &str,
    font: &FontSpec,
    budget: usize,
    settings: &SamplerSettings,
    rng: &mut G,
) -> SampledText
where
    R: TextRasterizer + ?Sized,
    G: Rng + ?Sized,
{
    let measured = match rasterizer.measure_text(text, font) {
        Ok(width) => width,
        Err(err) => {
            swarm_core::warn!(error = %err, text, "text measurement failed; no particles");
            return SampledText::empty();
        }
    };

    let padding = settings.padding.max(0.0);
    let width = measured.max(0.0).ceil() + padding * 2.0;
    let height = font.size_px * LINE_HEIGHT_FACTOR + padding * 2.0;

    let bitmap = match rasterizer.rasterize(text, font, width as u32, height as u32) {
        Ok(bitmap) => bitmap,
        Err(err) => {
            swarm_core::warn!(error = %err, text, "text rasterization failed; no particles");
            return SampledText::empty();
        }
    };

    let step = settings.step.max(1) as usize;
    let (half_w, half_h) = (width * 0.5, height * 0.5);
    let mut candidates = Vec::new();
    for y in (0..bitmap.height()).step_by(step) {
        for x in (0..bitmap.width()).step_by(step) {
            if bitmap.get(x, y) > settings.alpha_threshold {
                candidates.push(Vec2::new(x as f32 - half_w, -(y as f32 - half_h)));
            }
        }
    }

    let found = candidates.len();
    let points = if found <= budget {
        candidates
    } else {
        index::sample(rng, found, budget)
            .into_iter()
            .map(|i| candidates[i])
            .collect()
    };

    swarm_core::debug!(
        text,
        found,
        kept = points.len(),
        budget,
        width,
        height,
        "sampled heading"
    );

    SampledText {
        points,
        width,
        height,
    }
}

/// Await `ready`, then sample.
///
/// This is the one suspension point of the effect: hosts pass their font
/// readiness signal (e.g. `document.fonts.ready`). Its output is ignored; a
/// readiness future that never resolves simply leaves the section dark.
pub async fn sample_when_ready<F, R, G>(
    ready: F,
    rasterizer: &mut R,
    text: &str,
    font: &FontSpec,
    budget: usize,
    settings: &SamplerSettings,
    rng: &mut G,
) -> SampledText
where
    F: Future,
    R: TextRasterizer + ?Sized,
    G: Rng + ?Sized,
{
    ready.await;
    sample_text(rasterizer, text, font, budget, settings, rng)
}
