#![forbid(unsafe_code)]

//! One section's particle heading.
//!
//! A group moves through three states:
//!
//! ```text
//!   Idle ──request_sample──▶ Pending ──deliver(current ticket)──▶ Ready
//!    ▲                          │                                   │
//!    └──── heading / font / budget change, reset ◀─────────────────┘
//! ```
//!
//! Sampling is asynchronous on the web, so every request is tagged with a
//! [`SampleTicket`]. Anything that invalidates the particle set bumps the
//! generation; a delivery whose ticket no longer matches is dropped as stale
//! instead of overwriting newer state.

use glam::Vec2;
use rand::Rng;

use crate::particles::ParticleSet;
use crate::text_sampler::SampledText;

/// Identifies one sampling request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleTicket {
    pub section: String,
    pub generation: u64,
}

/// What happened to a delivered sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The sample became the group's particle set.
    Applied { particles: usize },
    /// The ticket was outdated or named an unknown section.
    Stale,
}

/// Sampling parameters a particle set was (or will be) built with.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SampleKey {
    font_size: f32,
    budget: usize,
}

/// A section heading rendered as particles.
#[derive(Debug, Clone)]
pub struct ParticleTextGroup {
    section_id: String,
    heading: String,
    generation: u64,
    /// Parameters of the in-flight or applied sample.
    key: Option<SampleKey>,
    pending: bool,
    particles: Option<ParticleSet>,
    anchor: Option<Vec2>,
    progress: f32,
}

impl ParticleTextGroup {
    pub fn new(section_id: impl Into<String>, heading: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            heading: heading.into(),
            generation: 0,
            key: None,
            pending: false,
            particles: None,
            anchor: None,
            progress: 0.0,
        }
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a request is out and unanswered.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The current particle set, once sampled.
    pub fn particles(&self) -> Option<&ParticleSet> {
        self.particles.as_ref()
    }

    /// Ticket for a new sample, or `None` if the current (or in-flight) set
    /// already matches these parameters.
    pub fn request_sample(&mut self, font_size: f32, budget: usize) -> Option<SampleTicket> {
        let key = SampleKey { font_size, budget };
        if self.key == Some(key) && (self.pending || self.particles.is_some()) {
            return None;
        }
        self.invalidate();
        self.key = Some(key);
        self.pending = true;
        Some(self.ticket())
    }

    /// Replace the heading text. Returns `true` if it changed, in which case
    /// the particle set is discarded and outstanding tickets become stale.
    pub fn set_heading(&mut self, heading: &str) -> bool {
        if self.heading == heading {
            return false;
        }
        self.heading = heading.to_string();
        self.invalidate();
        true
    }

    /// Drop the particle set and orphan any in-flight request.
    pub fn reset(&mut self) {
        self.invalidate();
    }

    /// Apply a sample if `ticket` is still current.
    pub fn deliver<G: Rng + ?Sized>(
        &mut self,
        ticket: &SampleTicket,
        sample: &SampledText,
        rng: &mut G,
    ) -> Delivery {
        if !self.pending || ticket != &self.ticket() {
            swarm_core::debug!(
                section = %ticket.section,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale sample"
            );
            return Delivery::Stale;
        }
        let set = ParticleSet::from_sample(sample, rng);
        let particles = set.len();
        self.particles = Some(set);
        self.pending = false;
        Delivery::Applied { particles }
    }

    /// Record the heading's screen-space center (CSS px, y down). `None`
    /// means the heading could not be located; the last anchor is kept.
    pub fn set_anchor(&mut self, anchor: Option<Vec2>) {
        match anchor {
            Some(a) if a.is_finite() => self.anchor = Some(a),
            _ => {
                swarm_core::trace!(section = %self.section_id, "heading not found; keeping anchor");
            }
        }
    }

    /// Last known anchor, or `fallback` if none was ever seen.
    pub fn anchor_or(&self, fallback: Vec2) -> Vec2 {
        self.anchor.unwrap_or(fallback)
    }

    /// Latest section progress supplied by the host.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress;
    }

    fn ticket(&self) -> SampleTicket {
        SampleTicket {
            section: self.section_id.clone(),
            generation: self.generation,
        }
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.key = None;
        self.pending = false;
        self.particles = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample(n: usize) -> SampledText {
        SampledText {
            points: vec![Vec2::new(1.0, 1.0); n],
            width: 100.0,
            height: 90.0,
        }
    }

    #[test]
    fn request_then_deliver_applies() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut group = ParticleTextGroup::new("about", "About Us");
        let ticket = group.request_sample(36.0, 2000).unwrap();
        assert!(group.is_pending());
        assert_eq!(
            group.deliver(&ticket, &sample(12), &mut rng),
            Delivery::Applied { particles: 12 }
        );
        assert_eq!(group.particles().map(ParticleSet::len), Some(12));
        assert!(!group.is_pending());
    }

    #[test]
    fn same_parameters_do_not_resample() {
        let mut group = ParticleTextGroup::new("about", "About Us");
        assert!(group.request_sample(36.0, 2000).is_some());
        assert!(group.request_sample(36.0, 2000).is_none());
        assert!(group.request_sample(28.0, 2000).is_some());
    }

    #[test]
    fn heading_change_makes_ticket_stale() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut group = ParticleTextGroup::new("about", "About Us");
        let ticket = group.request_sample(36.0, 2000).unwrap();
        assert!(group.set_heading("About Them"));
        assert_eq!(group.deliver(&ticket, &sample(5), &mut rng), Delivery::Stale);
        assert!(group.particles().is_none());
    }

    #[test]
    fn unchanged_heading_keeps_set() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut group = ParticleTextGroup::new("about", "About Us");
        let ticket = group.request_sample(36.0, 2000).unwrap();
        group.deliver(&ticket, &sample(5), &mut rng);
        assert!(!group.set_heading("About Us"));
        assert!(group.particles().is_some());
    }

    #[test]
    fn superseded_ticket_is_stale() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut group = ParticleTextGroup::new("about", "About Us");
        let old = group.request_sample(36.0, 2000).unwrap();
        let new = group.request_sample(36.0, 1000).unwrap();
        assert_eq!(group.deliver(&old, &sample(5), &mut rng), Delivery::Stale);
        assert_eq!(
            group.deliver(&new, &sample(5), &mut rng),
            Delivery::Applied { particles: 5 }
        );
        // A second delivery of the same ticket is also stale.
        assert_eq!(group.deliver(&new, &sample(5), &mut rng), Delivery::Stale);
    }

    #[test]
    fn anchor_keeps_last_known() {
        let mut group = ParticleTextGroup::new("about", "About Us");
        let fallback = Vec2::new(400.0, 300.0);
        assert_eq!(group.anchor_or(fallback), fallback);
        group.set_anchor(Some(Vec2::new(10.0, 20.0)));
        group.set_anchor(None);
        group.set_anchor(Some(Vec2::new(f32::NAN, 0.0)));
        assert_eq!(group.anchor_or(fallback), Vec2::new(10.0, 20.0));
    }
}
