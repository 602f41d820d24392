#![forbid(unsafe_code)]

//! Edge-to-center particle field.
//!
//! A section background of a few dozen glowing dots. Half of them start
//! beyond the left edge and half beyond the right; as the section scrolls
//! through the viewport they converge on random points in the middle, hold,
//! and drift back out. Each dot is a faint glow disc under a brighter core,
//! both pulsing with scroll.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swarm_core::animation::smoothstep;
use swarm_render::{BlendMode, Framebuffer, PackedRgba};

use crate::fx::{FxContext, FxQuality, ParticleFx};

/// Field tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// Dots on wide layouts.
    pub count: usize,
    /// Dots below `mobile_breakpoint`.
    pub count_mobile: usize,
    /// Layout width (CSS px) below which `count_mobile` applies.
    pub mobile_breakpoint: f32,
    /// Targets stay this fraction away from every edge.
    pub margin: f32,
    /// How far past the edge origins may start, as a fraction of width.
    pub origin_spread: f32,
    pub color: PackedRgba,
    /// Glow alpha as a fraction of the dot alpha.
    pub glow_alpha: f32,
    /// Core alpha as a fraction of the dot alpha.
    pub core_alpha: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            count: 40,
            count_mobile: 20,
            mobile_breakpoint: 768.0,
            margin: 0.15,
            origin_spread: 0.3,
            color: PackedRgba::CYAN,
            glow_alpha: 0.15,
            core_alpha: 0.9,
        }
    }
}

/// One dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParticle {
    pub origin: Vec2,
    pub target: Vec2,
    /// Core radius in CSS px.
    pub size: f32,
    /// Glow radius in CSS px.
    pub glow_size: f32,
    pub phase: f32,
}

/// Convergence of the field at section progress `p`.
///
/// Rises over [0.15, 0.35], holds at 1 until 0.65, falls over [0.65, 0.85].
#[must_use]
pub fn convergence(p: f32) -> f32 {
    if p < 0.35 {
        smoothstep(0.15, 0.35, p)
    } else if p < 0.65 {
        1.0
    } else {
        1.0 - smoothstep(0.65, 0.85, p)
    }
}

/// Dots that converge from the side edges.
#[derive(Debug, Clone)]
pub struct ParticleField {
    params: FieldParams,
    particles: Vec<FieldParticle>,
    width: f32,
    height: f32,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(params: FieldParams, seed: u64) -> Self {
        Self {
            params,
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[FieldParticle] {
        &self.particles
    }

    /// Regenerate dots for a `width x height` layout (CSS px).
    pub fn regenerate(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        let count = if width < self.params.mobile_breakpoint {
            self.params.count_mobile
        } else {
            self.params.count
        };
        let (w, h) = (self.width, self.height);
        let p = self.params;
        let inner = 1.0 - 2.0 * p.margin;
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|i| {
                let from_left = i < count / 2;
                let spread = rng.random::<f32>() * w * p.origin_spread;
                let origin_x = if from_left { -spread } else { w + spread };
                let origin = Vec2::new(origin_x, rng.random::<f32>() * h);
                let target = Vec2::new(
                    w * (p.margin + rng.random::<f32>() * inner),
                    h * (p.margin + rng.random::<f32>() * inner),
                );
                FieldParticle {
                    origin,
                    target,
                    size: 1.5 + rng.random::<f32>() * 2.0,
                    glow_size: 6.0 + rng.random::<f32>() * 8.0,
                    phase: rng.random::<f32>() * TAU,
                }
            })
            .collect();
    }

    /// Draw the field at section progress `progress`.
    pub fn draw(&self, fb: &mut Framebuffer, progress: f32, pixel_ratio: f32) {
        let conv = convergence(progress);
        let alpha = conv * 0.6 + 0.15;
        let p = &self.params;
        for particle in &self.particles {
            let pos = particle.origin.lerp(particle.target, conv) * pixel_ratio;
            let pulse = 0.7 + 0.3 * (particle.phase + progress * PI * 4.0).sin();
            fb.fill_circle(
                pos.x,
                pos.y,
                particle.glow_size * pulse * pixel_ratio,
                p.color.with_opacity(alpha * p.glow_alpha),
                BlendMode::Over,
            );
            fb.fill_circle(
                pos.x,
                pos.y,
                particle.size * pulse * pixel_ratio,
                p.color.with_opacity(alpha * p.core_alpha),
                BlendMode::Over,
            );
        }
    }
}

impl ParticleFx for ParticleField {
    fn name(&self) -> &'static str {
        "particle-field"
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.regenerate(width, height);
    }

    fn render(&mut self, ctx: &FxContext, fb: &mut Framebuffer) {
        if ctx.quality == FxQuality::Off {
            return;
        }
        if self.width != ctx.width || self.height != ctx.height {
            self.regenerate(ctx.width, ctx.height);
        }
        self.draw(fb, ctx.progress, ctx.pixel_ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergence_profile() {
        assert_eq!(convergence(0.0), 0.0);
        assert_eq!(convergence(0.15), 0.0);
        assert!((convergence(0.25) - 0.5).abs() < 1e-6);
        assert_eq!(convergence(0.5), 1.0);
        assert!((convergence(0.75) - 0.5).abs() < 1e-6);
        assert_eq!(convergence(0.9), 0.0);
    }

    #[test]
    fn counts_follow_breakpoint() {
        let mut field = ParticleField::new(FieldParams::default(), 1);
        field.regenerate(1024.0, 600.0);
        assert_eq!(field.particles().len(), 40);
        field.regenerate(400.0, 600.0);
        assert_eq!(field.particles().len(), 20);
    }

    #[test]
    fn origins_split_by_side_and_targets_respect_margin() {
        let mut field = ParticleField::new(FieldParams::default(), 2);
        field.regenerate(1000.0, 500.0);
        let ps = field.particles();
        for (i, p) in ps.iter().enumerate() {
            if i < ps.len() / 2 {
                assert!(p.origin.x <= 0.0);
            } else {
                assert!(p.origin.x >= 1000.0);
            }
            assert!((150.0..=850.0).contains(&p.target.x));
            assert!((75.0..=425.0).contains(&p.target.y));
        }
    }

    #[test]
    fn converged_field_lights_center_only_area() {
        let mut field = ParticleField::new(FieldParams::default(), 3);
        field.regenerate(800.0, 400.0);
        let mut fb = Framebuffer::new(800, 400);
        field.draw(&mut fb, 0.5, 1.0);
        assert!(fb.lit_pixels() > 0);
        // Targets sit inside the margin; the far corner stays dark.
        assert_eq!(fb.get(0, 0).a(), 0);
    }

    #[test]
    fn off_quality_draws_nothing() {
        let mut field = ParticleField::new(FieldParams::default(), 4);
        let mut fb = Framebuffer::new(100, 100);
        let ctx = FxContext {
            width: 100.0,
            height: 100.0,
            pixel_ratio: 1.0,
            time_seconds: 0.0,
            progress: 0.5,
            quality: FxQuality::Off,
        };
        field.render(&ctx, &mut fb);
        assert_eq!(fb.lit_pixels(), 0);
    }
}
