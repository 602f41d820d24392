#![forbid(unsafe_code)]

//! The full-page particle-text overlay.
//!
//! The overlay owns one [`ParticleTextGroup`] per configured section and the
//! page-level switches around them: reduced motion, the device-class
//! particle budget, and the font size. The host feeds it viewport changes,
//! per-section progress and heading anchors, runs the sampling requests it
//! hands out (synchronously via [`ParticleOverlay::sample_pending`] or
//! asynchronously, delivering results later), and calls
//! [`ParticleOverlay::render`] once per animation frame.
//!
//! With reduced motion active nothing is sampled, existing particle sets are
//! dropped, and nothing is drawn.

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use swarm_core::animation::stagger::Stagger;
use swarm_render::Framebuffer;

use crate::config::{SectionSpec, SwarmConfig};
use crate::fx::{FxContext, ParticleFx};
use crate::group::{Delivery, ParticleTextGroup, SampleTicket};
use crate::morph::{MorphState, ParticleSprite, SpriteStyle, draw_sprites, update_sprites};
use crate::raster::{FontSpec, TextRasterizer};
use crate::scroll::{ContentKeyframes, ContentTransform};
use crate::text_sampler::{SampledText, SamplerSettings, sample_text};

/// Browser viewport in CSS px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Screen center; the anchor used before a heading has been located.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0, 1.0)
    }
}

/// Work order for the host: sample `text` and deliver it with `ticket`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRequest {
    pub ticket: SampleTicket,
    pub text: String,
    pub font: FontSpec,
    pub budget: usize,
}

/// What a frame drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Sections with at least one visible sprite.
    pub sections: usize,
    /// Sprites drawn across all sections.
    pub sprites: usize,
}

/// Scroll-driven particle headings for every tracked section.
#[derive(Debug)]
pub struct ParticleOverlay {
    config: SwarmConfig,
    groups: Vec<ParticleTextGroup>,
    viewport: Viewport,
    host_reduced_motion: bool,
    stagger: Stagger,
    settings: SamplerSettings,
    content: ContentKeyframes,
    rng: StdRng,
    sprites: Vec<ParticleSprite>,
}

impl ParticleOverlay {
    /// Overlay for `config.sections`, with particle randomness seeded from
    /// `seed`.
    pub fn new(config: SwarmConfig, seed: u64) -> Self {
        let groups = config
            .sections
            .iter()
            .map(|s| ParticleTextGroup::new(s.id.clone(), s.heading.clone()))
            .collect();
        swarm_core::debug!(summary = %config.summary_short(), "overlay created");
        Self {
            stagger: Stagger::new(config.max_stagger),
            settings: SamplerSettings::from(&config),
            groups,
            viewport: Viewport::default(),
            host_reduced_motion: false,
            content: ContentKeyframes::heading_content(),
            rng: StdRng::seed_from_u64(seed),
            sprites: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn sampler_settings(&self) -> SamplerSettings {
        self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn groups(&self) -> &[ParticleTextGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&ParticleTextGroup> {
        self.groups.iter().find(|g| g.section_id() == id)
    }

    fn group_mut(&mut self, id: &str) -> Option<&mut ParticleTextGroup> {
        self.groups.iter_mut().find(|g| g.section_id() == id)
    }

    /// Whether the effect runs at all.
    pub fn is_active(&self) -> bool {
        !(self.config.reduced_motion || self.host_reduced_motion)
    }

    /// Apply the host's reduced-motion preference.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        let was_active = self.is_active();
        self.host_reduced_motion = reduced;
        if was_active && !self.is_active() {
            swarm_core::info!("reduced motion on; dropping particle sets");
            for group in &mut self.groups {
                group.reset();
            }
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Heading font size for the current viewport.
    pub fn font_size(&self) -> f32 {
        self.config.font_size_for_width(self.viewport.width)
    }

    /// Particle budget for the current viewport.
    pub fn budget(&self) -> usize {
        self.config.budget_for_width(self.viewport.width)
    }

    /// Capped pixel ratio for the current viewport.
    pub fn pixel_ratio(&self) -> f32 {
        self.config.pixel_ratio(self.viewport.device_pixel_ratio)
    }

    /// Requests for every group whose particle set is missing or was built
    /// for a different font size or budget. Empty while inactive.
    pub fn pending_requests(&mut self) -> Vec<SampleRequest> {
        if !self.is_active() {
            return Vec::new();
        }
        let font_size = self.font_size();
        let budget = self.budget();
        let family = self.config.font_family.clone();
        self.groups
            .iter_mut()
            .filter_map(|group| {
                let ticket = group.request_sample(font_size, budget)?;
                Some(SampleRequest {
                    ticket,
                    text: group.heading().to_string(),
                    font: FontSpec::bold(family.clone(), font_size),
                    budget,
                })
            })
            .collect()
    }

    /// Hand a finished sample back.
    pub fn deliver(&mut self, ticket: &SampleTicket, sample: &SampledText) -> Delivery {
        if !self.is_active() {
            return Delivery::Stale;
        }
        let Self { groups, rng, .. } = self;
        match groups.iter_mut().find(|g| g.section_id() == ticket.section) {
            Some(group) => group.deliver(ticket, sample, rng),
            None => {
                swarm_core::debug!(section = %ticket.section, "sample for removed section");
                Delivery::Stale
            }
        }
    }

    /// Run every pending request synchronously. Returns the number applied.
    pub fn sample_pending<R: TextRasterizer + ?Sized>(&mut self, rasterizer: &mut R) -> usize {
        let requests = self.pending_requests();
        let mut applied = 0;
        for req in requests {
            let sample = sample_text(
                rasterizer,
                &req.text,
                &req.font,
                req.budget,
                &self.settings,
                &mut self.rng,
            );
            if matches!(self.deliver(&req.ticket, &sample), Delivery::Applied { .. }) {
                applied += 1;
            }
        }
        applied
    }

    /// Settle requests the host cannot sample at all (no rasterizer). Each
    /// section gets an empty particle set, so it stops waiting and draws
    /// nothing until its parameters change. Returns the number applied.
    pub fn settle_unsampled(&mut self, requests: &[SampleRequest]) -> usize {
        let empty = SampledText::empty();
        requests
            .iter()
            .filter(|req| matches!(self.deliver(&req.ticket, &empty), Delivery::Applied { .. }))
            .count()
    }

    /// Start tracking a section. Returns `false` if the id is taken.
    pub fn add_section(&mut self, spec: SectionSpec) -> bool {
        if self.group(&spec.id).is_some() {
            return false;
        }
        self.groups.push(ParticleTextGroup::new(spec.id, spec.heading));
        true
    }

    /// Stop tracking a section; its in-flight samples become stale.
    pub fn remove_section(&mut self, id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.section_id() != id);
        self.groups.len() != before
    }

    /// Change a section's heading. Returns `true` if it changed.
    pub fn set_heading(&mut self, id: &str, heading: &str) -> bool {
        self.group_mut(id).is_some_and(|g| g.set_heading(heading))
    }

    pub fn set_progress(&mut self, id: &str, progress: f32) {
        if let Some(group) = self.group_mut(id) {
            group.set_progress(progress);
        }
    }

    /// Heading center in CSS px; `None` keeps the last known anchor.
    pub fn set_anchor(&mut self, id: &str, anchor: Option<Vec2>) {
        if let Some(group) = self.group_mut(id) {
            group.set_anchor(anchor);
        }
    }

    /// Morph state of a section at its latest progress.
    pub fn section_state(&self, id: &str) -> Option<MorphState> {
        self.group(id)
            .map(|g| MorphState::at(g.progress(), &self.config.phases))
    }

    /// Transform for the content under a section's heading.
    pub fn content_transform(&self, id: &str) -> Option<ContentTransform> {
        let reduced = !self.is_active();
        self.group(id)
            .map(|g| self.content.at(g.progress(), reduced))
    }

    /// Draw every ready section at animation time `time` (seconds).
    pub fn render(&mut self, fb: &mut Framebuffer, time: f32) -> FrameStats {
        let pixel_ratio = self.pixel_ratio();
        self.render_with(fb, time, pixel_ratio)
    }

    fn render_with(&mut self, fb: &mut Framebuffer, time: f32, pixel_ratio: f32) -> FrameStats {
        let mut stats = FrameStats::default();
        if !self.is_active() {
            return stats;
        }
        let style = SpriteStyle {
            point_size: self.config.point_size,
            pixel_ratio,
            ..SpriteStyle::default()
        };
        let center = self.viewport.center();
        let Self {
            groups,
            sprites,
            config,
            stagger,
            ..
        } = self;
        for group in groups.iter() {
            let Some(set) = group.particles() else {
                continue;
            };
            let state = MorphState::at(group.progress(), &config.phases);
            update_sprites(set, &state, *stagger, time, sprites);
            let drawn = draw_sprites(fb, sprites, group.anchor_or(center), &style);
            if drawn > 0 {
                stats.sections += 1;
                stats.sprites += drawn;
            }
        }
        stats
    }
}

impl ParticleFx for ParticleOverlay {
    fn name(&self) -> &'static str {
        "particle-text"
    }

    fn resize(&mut self, width: f32, height: f32) {
        let dpr = self.viewport.device_pixel_ratio;
        self.set_viewport(Viewport::new(width, height, dpr));
    }

    fn render(&mut self, ctx: &FxContext, fb: &mut Framebuffer) {
        if !ctx.quality.is_enabled() {
            return;
        }
        self.render_with(fb, ctx.time_seconds, ctx.pixel_ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleSet;
    use crate::raster::BitmapFontRasterizer;

    fn overlay() -> ParticleOverlay {
        ParticleOverlay::new(SwarmConfig::default(), 42)
    }

    #[test]
    fn budgets_follow_viewport() {
        let mut o = overlay();
        o.set_viewport(Viewport::new(500.0, 800.0, 2.0));
        assert_eq!(o.budget(), 1000);
        assert_eq!(o.font_size(), 28.0);
        assert_eq!(o.pixel_ratio(), 1.5);
        o.set_viewport(Viewport::new(1280.0, 800.0, 1.0));
        assert_eq!(o.budget(), 2000);
        assert_eq!(o.font_size(), 36.0);
    }

    #[test]
    fn one_request_per_section_until_parameters_change() {
        let mut o = overlay();
        let first = o.pending_requests();
        assert_eq!(first.len(), 3);
        assert_eq!(first[1].text, "About Us");
        assert_eq!(first[1].font.size_px, 36.0);
        assert!(o.pending_requests().is_empty());
        o.set_viewport(Viewport::new(600.0, 800.0, 1.0));
        assert_eq!(o.pending_requests().len(), 3);
    }

    #[test]
    fn sync_sampling_fills_every_group() {
        let mut o = overlay();
        assert_eq!(o.sample_pending(&mut BitmapFontRasterizer::new()), 3);
        assert!(o.groups().iter().all(|g| g.particles().is_some()));
    }

    #[test]
    fn reduced_motion_samples_and_draws_nothing() {
        let mut o = overlay();
        o.sample_pending(&mut BitmapFontRasterizer::new());
        o.set_reduced_motion(true);
        assert!(o.groups().iter().all(|g| g.particles().is_none()));
        assert!(o.pending_requests().is_empty());
        o.set_progress("about", 0.39);
        let mut fb = Framebuffer::new(64, 64);
        assert_eq!(o.render(&mut fb, 0.0), FrameStats::default());
        assert_eq!(fb.lit_pixels(), 0);
        assert_eq!(
            o.content_transform("about"),
            Some(ContentTransform::IDENTITY)
        );
    }

    #[test]
    fn removed_section_rejects_delivery() {
        let mut o = overlay();
        let reqs = o.pending_requests();
        assert!(o.remove_section("contact"));
        let contact = reqs.iter().find(|r| r.ticket.section == "contact").unwrap();
        assert_eq!(
            o.deliver(&contact.ticket, &SampledText::empty()),
            Delivery::Stale
        );
    }

    #[test]
    fn sections_can_be_added_once() {
        let mut o = overlay();
        assert!(o.add_section(SectionSpec::new("team", "Team")));
        assert!(!o.add_section(SectionSpec::new("team", "Team")));
        assert_eq!(o.groups().len(), 4);
    }

    #[test]
    fn held_section_draws_at_viewport_center() {
        let mut o = overlay();
        o.set_viewport(Viewport::new(400.0, 300.0, 1.0));
        o.sample_pending(&mut BitmapFontRasterizer::new());
        o.set_progress("about", 0.39);
        let mut fb = Framebuffer::new(400, 300);
        let stats = o.render(&mut fb, 1.0);
        assert_eq!(stats.sections, 1);
        assert!(stats.sprites > 0);
        // Sprites cluster around (200, 150).
        assert!(fb.get(0, 0).a() == 0);
        assert!(fb.lit_pixels() > 0);
    }

    #[test]
    fn unsampled_requests_settle_empty() {
        let mut o = overlay();
        let reqs = o.pending_requests();
        assert_eq!(o.settle_unsampled(&reqs), 3);
        for g in o.groups() {
            assert!(!g.is_pending());
            assert_eq!(g.particles().map(ParticleSet::len), Some(0));
        }
        // Settled sections are not re-requested for the same parameters.
        assert!(o.pending_requests().is_empty());
        o.set_progress("about", 0.39);
        let mut fb = Framebuffer::new(64, 64);
        assert_eq!(o.render(&mut fb, 0.0), FrameStats::default());
        // A viewport change still asks again.
        o.set_viewport(Viewport::new(600.0, 800.0, 1.0));
        assert_eq!(o.pending_requests().len(), 3);
    }
}
