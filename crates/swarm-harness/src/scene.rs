#![forbid(unsafe_code)]

//! Offline scenes: one sampled heading, or one backdrop, at a chosen
//! progress and clock.

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use swarm_core::animation::stagger::Stagger;
use swarm_fx::field::{FieldParams, ParticleField};
use swarm_fx::fx::{FxContext, FxQuality, ParticleFx};
use swarm_fx::morph::{MorphState, ParticleSprite, SpriteStyle, draw_sprites, update_sprites};
use swarm_fx::network::{NetworkParams, ParticleNetwork};
use swarm_fx::particles::ParticleSet;
use swarm_fx::raster::{BitmapFontRasterizer, FontSpec};
use swarm_fx::scroll::ContentKeyframes;
use swarm_fx::text_sampler::{SampledText, SamplerSettings, sample_text};
use swarm_fx::SwarmConfig;
use swarm_render::Framebuffer;

use crate::cli::Effect;

/// ASCII cell size in px.
const CELL_W: f32 = 4.0;
const CELL_H: f32 = 8.0;

/// A heading sampled with the built-in face.
pub struct TextScene {
    config: SwarmConfig,
    font: FontSpec,
    budget: usize,
    sample: SampledText,
    set: ParticleSet,
}

impl TextScene {
    pub fn build(config: SwarmConfig, text: &str, font_size: f32, budget: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let font = FontSpec::bold(config.font_family.clone(), font_size);
        let settings = SamplerSettings::from(&config);
        let sample = sample_text(
            &mut BitmapFontRasterizer::new(),
            text,
            &font,
            budget,
            &settings,
            &mut rng,
        );
        let set = ParticleSet::from_sample(&sample, &mut rng);
        Self {
            config,
            font,
            budget,
            sample,
            set,
        }
    }

    pub fn sample(&self) -> &SampledText {
        &self.sample
    }

    fn stagger(&self) -> Stagger {
        Stagger::new(self.config.max_stagger)
    }

    fn sprites(&self, progress: f32, time: f32) -> Vec<ParticleSprite> {
        let state = MorphState::at(progress, &self.config.phases);
        let mut sprites = Vec::new();
        update_sprites(&self.set, &state, self.stagger(), time, &mut sprites);
        sprites
    }

    /// JSON lines: a header describing the sample, then one line per step.
    pub fn trace_lines(&self, steps: u32) -> Vec<String> {
        let content = ContentKeyframes::heading_content();
        let mut lines = Vec::with_capacity(steps as usize + 2);
        lines.push(
            json!({
                "font": self.font.css(),
                "budget": self.budget,
                "points": self.sample.len(),
                "width": self.sample.width,
                "height": self.sample.height,
            })
            .to_string(),
        );
        for i in 0..=steps {
            let progress = i as f32 / steps as f32;
            let state = MorphState::at(progress, &self.config.phases);
            let c = content.at(progress, false);
            lines.push(
                json!({
                    "progress": progress,
                    "phase": state.phase.as_str(),
                    "morph": state.morph,
                    "opacity": state.opacity,
                    "content_opacity": c.opacity,
                    "content_y": c.offset_y,
                })
                .to_string(),
            );
        }
        lines
    }

    /// Text-art preview of the sample box: one char per 4x8 px cell.
    pub fn ascii(&self, progress: f32, time: f32) -> String {
        let cols = (self.sample.width / CELL_W).ceil().max(1.0) as usize;
        let rows = (self.sample.height / CELL_H).ceil().max(1.0) as usize;
        let mut weight = vec![0.0f32; cols * rows];
        let (half_w, half_h) = (self.sample.width * 0.5, self.sample.height * 0.5);
        for sprite in self.sprites(progress, time) {
            let cx = ((sprite.position.x + half_w) / CELL_W).floor();
            let cy = ((half_h - sprite.position.y) / CELL_H).floor();
            if cx < 0.0 || cy < 0.0 || cx >= cols as f32 || cy >= rows as f32 {
                continue;
            }
            weight[cy as usize * cols + cx as usize] += sprite.alpha;
        }
        let mut out = String::with_capacity((cols + 1) * rows);
        for row in weight.chunks(cols) {
            for &w in row {
                out.push(match w {
                    w if w <= 0.0 => ' ',
                    w if w < 1.0 => '.',
                    w if w < 3.0 => ':',
                    _ => '#',
                });
            }
            out.push('\n');
        }
        out
    }

    /// Render a `width x height` viewport with the heading at its center.
    pub fn frame(&self, progress: f32, time: f32, width: u32, height: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(width, height);
        let style = SpriteStyle {
            point_size: self.config.point_size,
            ..SpriteStyle::default()
        };
        let anchor = Vec2::new(width as f32 * 0.5, height as f32 * 0.5);
        let sprites = self.sprites(progress, time);
        let drawn = draw_sprites(&mut fb, &sprites, anchor, &style);
        tracing::debug!(drawn, progress, time, "text frame rendered");
        fb
    }
}

/// Render one backdrop frame.
pub fn backdrop_frame(
    effect: Effect,
    width: u32,
    height: u32,
    progress: f32,
    time: f32,
    seed: u64,
) -> Framebuffer {
    let mut fb = Framebuffer::new(width, height);
    let ctx = FxContext {
        width: width as f32,
        height: height as f32,
        pixel_ratio: 1.0,
        time_seconds: time,
        progress,
        quality: FxQuality::for_viewport(false, width as f32, 768.0),
    };
    let mut fx: Box<dyn ParticleFx> = match effect {
        Effect::Field => Box::new(ParticleField::new(FieldParams::default(), seed)),
        Effect::Network | Effect::Text => {
            Box::new(ParticleNetwork::new(NetworkParams::default(), seed))
        }
    };
    fx.resize(ctx.width, ctx.height);
    fx.render(&ctx, &mut fb);
    tracing::debug!(fx = fx.name(), lit = fb.lit_pixels(), "backdrop frame rendered");
    fb
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn about() -> TextScene {
        TextScene::build(SwarmConfig::default(), "About Us", 36.0, 2000, 1)
    }

    #[test]
    fn trace_has_header_and_every_step() {
        let lines = about().trace_lines(100);
        assert_eq!(lines.len(), 102);
        let header: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(header["budget"], 2000);
        let first: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(first["phase"], "approaching");
        assert_eq!(first["opacity"], 0.0);
        let last: serde_json::Value = serde_json::from_str(&lines[101]).unwrap();
        assert_eq!(last["phase"], "departed");
    }

    #[test]
    fn held_ascii_spells_something() {
        let scene = about();
        let held = scene.ascii(0.39, 0.0);
        assert!(held.contains('#') || held.contains(':'));
        let blank = scene.ascii(0.0, 0.0);
        assert!(blank.chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn held_frame_lights_center() {
        let fb = about().frame(0.39, 0.0, 320, 200);
        assert!(fb.lit_pixels() > 0);
        assert_eq!(fb.get(0, 0).a(), 0);
    }

    #[test]
    fn backdrops_render() {
        assert!(backdrop_frame(Effect::Network, 320, 200, 0.0, 1.0, 3).lit_pixels() > 0);
        assert!(backdrop_frame(Effect::Field, 800, 400, 0.5, 0.0, 3).lit_pixels() > 0);
    }
}
