#![forbid(unsafe_code)]

//! Scatter-to-text morph.
//!
//! Section progress maps to a [`MorphState`] through a pure function of the
//! progress scalar; nothing about the phase is remembered between frames.
//! Each particle then derives its own position and alpha from the state, its
//! static [`ParticleRecord`], and the animation clock.
//!
//! ```text
//! progress  0 ─ Approaching ─ Converging ─ Held ─ Diverging ─ Reappearing ─ Dispersing ─ Departed ─ 1
//! opacity        0            0 → 1        1      1 → 0        0 … 0 → 1     1            1 → 0
//! morph          0            0 … 0 → 1    1      1            1             1 → 0        0
//! ```
//!
//! # Invariants
//!
//! 1. `opacity` and `morph` are in [0, 1] for every input, NaN included.
//! 2. Both are continuous in progress when the boundaries are ascending.
//! 3. Opacity is 0 at progress 0 and at progress 1.
//! 4. In the Held phase every particle has eased factor 1, whatever its
//!    stagger, provided `max_stagger < 1`.

use std::fmt;

use glam::{Vec2, Vec3};
use swarm_core::animation::stagger::Stagger;
use swarm_core::animation::{clamp_unit, ramp};
use swarm_render::{BlendMode, Framebuffer, PackedRgba};

use crate::config::PhaseBoundaries;
use crate::particles::{ParticleRecord, ParticleSet};

// ---------------------------------------------------------------------------
// Phase mapping
// ---------------------------------------------------------------------------

/// Named span of section progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MorphPhase {
    /// Section not yet far enough in; nothing visible.
    Approaching,
    /// Fading in, then flying into the text.
    Converging,
    /// Fully resolved text.
    Held,
    /// Fading out while still text-shaped.
    Diverging,
    /// Invisible, then fading back in as text.
    Reappearing,
    /// Scattering back outward.
    Dispersing,
    /// Scattered and fading out for good.
    Departed,
}

impl MorphPhase {
    pub const ALL: [Self; 7] = [
        Self::Approaching,
        Self::Converging,
        Self::Held,
        Self::Diverging,
        Self::Reappearing,
        Self::Dispersing,
        Self::Departed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approaching => "approaching",
            Self::Converging => "converging",
            Self::Held => "held",
            Self::Diverging => "diverging",
            Self::Reappearing => "reappearing",
            Self::Dispersing => "dispersing",
            Self::Departed => "departed",
        }
    }
}

impl fmt::Display for MorphPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame morph parameters derived from section progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MorphState {
    /// Clamped section progress.
    pub progress: f32,
    pub phase: MorphPhase,
    /// Global scatter → text factor, before per-particle stagger.
    pub morph: f32,
    /// Global opacity multiplier.
    pub opacity: f32,
}

impl MorphState {
    /// Map section progress to the morph state.
    #[must_use]
    pub fn at(progress: f32, b: &PhaseBoundaries) -> Self {
        let p = clamp_unit(progress);
        let (phase, opacity, morph) = if p < b.converge_start {
            (MorphPhase::Approaching, 0.0, 0.0)
        } else if p < b.morph_end {
            (
                MorphPhase::Converging,
                ramp(b.converge_start, b.morph_start, p),
                ramp(b.morph_start, b.morph_end, p),
            )
        } else if p < b.hold_end {
            (MorphPhase::Held, 1.0, 1.0)
        } else if p < b.diverge_end {
            (
                MorphPhase::Diverging,
                1.0 - ramp(b.hold_end, b.diverge_end, p),
                1.0,
            )
        } else if p < b.disperse_start {
            (
                MorphPhase::Reappearing,
                ramp(b.reappear_start, b.disperse_start, p),
                1.0,
            )
        } else if p < b.depart_start {
            (
                MorphPhase::Dispersing,
                1.0,
                1.0 - ramp(b.disperse_start, b.depart_start, p),
            )
        } else {
            (MorphPhase::Departed, 1.0 - ramp(b.depart_start, 1.0, p), 0.0)
        };
        Self {
            progress: p,
            phase,
            morph,
            opacity,
        }
    }

    /// Whether anything would be drawn.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

// ---------------------------------------------------------------------------
// Per-particle update
// ---------------------------------------------------------------------------

/// Spiral amplitude on each axis, in text-local px.
pub const SPIRAL_AMPLITUDE: Vec3 = Vec3::new(40.0, 25.0, 10.0);
/// Idle jitter amplitude on x and y.
pub const JITTER_AMPLITUDE: f32 = 0.3;
/// Alpha floor of a particle that has not started moving.
pub const BASE_ALPHA: f32 = 0.3;

/// A particle ready to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    /// Text-local position (y up).
    pub position: Vec3,
    /// Final alpha, global opacity included.
    pub alpha: f32,
    /// Staggered, eased morph factor of this particle.
    pub eased: f32,
    /// Size multiplier.
    pub size: f32,
}

/// Position and alpha of one particle at global morph `state.morph`.
#[must_use]
pub fn particle_at(
    record: &ParticleRecord,
    state: &MorphState,
    stagger: Stagger,
    time: f32,
) -> ParticleSprite {
    let seed = record.seed;
    let eased = stagger.eased(state.morph, seed.stagger);
    let mut position = record.scattered.lerp(record.target, eased);

    let strength = 1.0 - eased;
    if strength > 0.0 {
        let angle = time * (1.0 + seed.spin * 2.0) + seed.phase * std::f32::consts::TAU;
        let radius = strength * (0.5 + seed.stagger * 0.5);
        position += Vec3::new(angle.cos(), (angle * 0.7).sin(), (angle * 0.5).sin())
            * SPIRAL_AMPLITUDE
            * radius;
    }

    position.x += (time * 0.5 + seed.stagger * 10.0).sin() * JITTER_AMPLITUDE;
    position.y += (time * 0.4 + seed.spin * 10.0).cos() * JITTER_AMPLITUDE;

    ParticleSprite {
        position,
        alpha: (BASE_ALPHA + (1.0 - BASE_ALPHA) * eased) * state.opacity,
        eased,
        size: record.size,
    }
}

/// Compute sprites for a whole set into `out` (cleared first).
///
/// Invisible states leave `out` empty.
pub fn update_sprites(
    set: &ParticleSet,
    state: &MorphState,
    stagger: Stagger,
    time: f32,
    out: &mut Vec<ParticleSprite>,
) {
    out.clear();
    if !state.is_visible() {
        return;
    }
    out.reserve(set.len());
    out.extend(
        set.records()
            .iter()
            .map(|record| particle_at(record, state, stagger, time)),
    );
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// How sprites turn into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteStyle {
    /// Base diameter in device px.
    pub point_size: f32,
    /// Capped device pixel ratio.
    pub pixel_ratio: f32,
    pub base: PackedRgba,
    /// White added at the sprite center.
    pub core_boost: f32,
    /// Fraction of the way to white at full convergence.
    pub converge_whiten: f32,
    pub blend: BlendMode,
}

impl Default for SpriteStyle {
    fn default() -> Self {
        Self {
            point_size: 3.0,
            pixel_ratio: 1.0,
            base: PackedRgba::ACCENT_CYAN,
            core_boost: 0.3,
            converge_whiten: 0.25,
            blend: BlendMode::Additive,
        }
    }
}

/// Draw sprites around `anchor` (screen CSS px, y down). Returns the number
/// of sprites with non-zero alpha.
pub fn draw_sprites(
    fb: &mut Framebuffer,
    sprites: &[ParticleSprite],
    anchor: Vec2,
    style: &SpriteStyle,
) -> usize {
    let pr = style.pixel_ratio;
    let mut drawn = 0;
    for sprite in sprites {
        if sprite.alpha <= 0.0 {
            continue;
        }
        let x = (anchor.x + sprite.position.x) * pr;
        let y = (anchor.y - sprite.position.y) * pr;
        let diameter = style.point_size * sprite.size * pr;
        let base = style
            .base
            .lerp(PackedRgba::WHITE, sprite.eased * style.converge_whiten);
        fb.draw_soft_point(x, y, diameter, base, sprite.alpha, style.core_boost, style.blend);
        drawn += 1;
    }
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleSeed;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn phases() -> PhaseBoundaries {
        PhaseBoundaries::default()
    }

    fn record(stagger: f32) -> ParticleRecord {
        ParticleRecord {
            scattered: Vec3::new(100.0, 50.0, 5.0),
            target: Vec3::new(-10.0, 4.0, 0.0),
            seed: ParticleSeed {
                stagger,
                spin: 0.5,
                phase: 0.25,
            },
            size: 1.0,
        }
    }

    #[test]
    fn phase_table_at_defaults() {
        let cases = [
            (0.0, MorphPhase::Approaching, 0.0, 0.0),
            (0.15, MorphPhase::Converging, 0.5, 0.0),
            (0.28, MorphPhase::Converging, 1.0, 0.5),
            (0.39, MorphPhase::Held, 1.0, 1.0),
            (0.43, MorphPhase::Diverging, 0.5, 1.0),
            (0.50, MorphPhase::Reappearing, 0.0, 1.0),
            (0.62, MorphPhase::Reappearing, 0.5, 1.0),
            (0.70, MorphPhase::Dispersing, 1.0, 1.0 - 0.04 / 0.19),
            (0.925, MorphPhase::Departed, 0.5, 0.0),
            (1.0, MorphPhase::Departed, 0.0, 0.0),
        ];
        for (p, phase, opacity, morph) in cases {
            let s = MorphState::at(p, &phases());
            assert_eq!(s.phase, phase, "phase at {p}");
            assert!((s.opacity - opacity).abs() < 1e-4, "opacity at {p}: {}", s.opacity);
            assert!((s.morph - morph).abs() < 1e-4, "morph at {p}: {}", s.morph);
        }
    }

    #[test]
    fn out_of_range_progress_clamps() {
        assert_eq!(MorphState::at(-3.0, &phases()).phase, MorphPhase::Approaching);
        assert_eq!(MorphState::at(f32::NAN, &phases()).opacity, 0.0);
        assert_eq!(MorphState::at(9.0, &phases()).opacity, 0.0);
    }

    #[test]
    fn held_particles_sit_on_target_plus_jitter() {
        let state = MorphState::at(0.39, &phases());
        for stagger in [0.0, 0.5, 0.999] {
            let sprite = particle_at(&record(stagger), &state, Stagger::new(0.3), 12.0);
            assert_eq!(sprite.eased, 1.0);
            assert!((sprite.alpha - 1.0).abs() < 1e-6);
            let offset = sprite.position - Vec3::new(-10.0, 4.0, 0.0);
            assert!(offset.x.abs() <= JITTER_AMPLITUDE + 1e-5);
            assert!(offset.y.abs() <= JITTER_AMPLITUDE + 1e-5);
            assert_eq!(offset.z, 0.0);
        }
    }

    #[test]
    fn approaching_draws_nothing() {
        let mut set_rng = StdRng::seed_from_u64(1);
        let sample = crate::text_sampler::SampledText {
            points: vec![Vec2::ZERO; 4],
            width: 10.0,
            height: 10.0,
        };
        let set = ParticleSet::from_sample(&sample, &mut set_rng);
        let mut out = vec![];
        update_sprites(&set, &MorphState::at(0.05, &phases()), Stagger::default(), 0.0, &mut out);
        assert!(out.is_empty());
        update_sprites(&set, &MorphState::at(0.39, &phases()), Stagger::default(), 0.0, &mut out);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn scattered_alpha_floor() {
        let state = MorphState::at(0.17, &phases());
        let sprite = particle_at(&record(0.0), &state, Stagger::default(), 0.0);
        assert_eq!(sprite.eased, 0.0);
        assert!((sprite.alpha - BASE_ALPHA * state.opacity).abs() < 1e-6);
    }

    #[test]
    fn sprites_land_around_anchor() {
        let mut fb = Framebuffer::new(64, 64);
        let sprite = ParticleSprite {
            position: Vec3::new(2.0, 3.0, 0.0),
            alpha: 1.0,
            eased: 1.0,
            size: 2.0,
        };
        let drawn = draw_sprites(&mut fb, &[sprite], Vec2::new(20.0, 20.0), &SpriteStyle::default());
        assert_eq!(drawn, 1);
        // Screen position (22, 17): y flips.
        assert!(fb.get(22, 17).a() > 0);
        assert_eq!(fb.get(22, 23).a(), 0);
    }
}
