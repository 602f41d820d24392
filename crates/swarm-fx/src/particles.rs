#![forbid(unsafe_code)]

//! Per-particle static attributes.
//!
//! A [`ParticleSet`] is built once from a [`SampledText`] and never mutated:
//! every per-frame quantity is derived from these records plus the current
//! morph state. Resampling produces a whole new set.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::text_sampler::SampledText;

/// Scatter ring inner radius as a fraction of the text box.
pub const SCATTER_RADIUS_MIN: f32 = 0.5;
/// Vertical stretch of the scatter ring.
pub const SCATTER_Y_STRETCH: f32 = 1.5;
/// Scatter depth spans `[-SCATTER_DEPTH / 2, SCATTER_DEPTH / 2)`.
pub const SCATTER_DEPTH: f32 = 20.0;
/// Smallest size multiplier.
pub const SIZE_MIN: f32 = 0.8;
/// Size multiplier spread (sizes fall in `[SIZE_MIN, SIZE_MIN + SIZE_SPREAD)`).
pub const SIZE_SPREAD: f32 = 0.4;

/// Three independent uniform values in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSeed {
    /// Drives the morph delay and spiral radius.
    pub stagger: f32,
    /// Drives spiral angular speed.
    pub spin: f32,
    /// Spiral starting angle as a fraction of a turn.
    pub phase: f32,
}

impl ParticleSeed {
    fn random<G: Rng + ?Sized>(rng: &mut G) -> Self {
        Self {
            stagger: rng.random::<f32>(),
            spin: rng.random::<f32>(),
            phase: rng.random::<f32>(),
        }
    }
}

/// One particle's immutable attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRecord {
    /// Position when fully scattered (text-local, y up).
    pub scattered: Vec3,
    /// Position when fully resolved into text (z = 0).
    pub target: Vec3,
    pub seed: ParticleSeed,
    /// Sprite size multiplier.
    pub size: f32,
}

/// The particles for one heading.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleSet {
    records: Vec<ParticleRecord>,
    text_width: f32,
    text_height: f32,
}

impl ParticleSet {
    /// One particle per sampled point.
    ///
    /// Scattered positions lie on a ring sized to the text box: angle uniform
    /// in `[0, 2π)`, radius factor uniform in `[0.5, 1)`, the y axis stretched
    /// by 1.5, and depth uniform in `[-10, 10)`.
    pub fn from_sample<G: Rng + ?Sized>(sample: &SampledText, rng: &mut G) -> Self {
        let (w, h) = (sample.width, sample.height);
        let records = sample
            .points
            .iter()
            .map(|point| {
                let angle = rng.random::<f32>() * TAU;
                let r = SCATTER_RADIUS_MIN + rng.random::<f32>() * (1.0 - SCATTER_RADIUS_MIN);
                let z = (rng.random::<f32>() - 0.5) * SCATTER_DEPTH;
                let scattered = Vec3::new(
                    angle.cos() * r * w,
                    angle.sin() * r * h * SCATTER_Y_STRETCH,
                    z,
                );
                let seed = ParticleSeed::random(rng);
                let size = SIZE_MIN + rng.random::<f32>() * SIZE_SPREAD;
                ParticleRecord {
                    scattered,
                    target: point.extend(0.0),
                    seed,
                    size,
                }
            })
            .collect();
        Self {
            records,
            text_width: w,
            text_height: h,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[ParticleRecord] {
        &self.records
    }

    pub fn text_width(&self) -> f32 {
        self.text_width
    }

    pub fn text_height(&self) -> f32 {
        self.text_height
    }
}
