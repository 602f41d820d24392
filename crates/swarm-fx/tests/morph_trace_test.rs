//! End-to-end sweeps of section progress through the morph engine.

use glam::Vec2;
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use swarm_core::animation::stagger::Stagger;
use swarm_fx::morph::{MorphPhase, MorphState, particle_at, update_sprites};
use swarm_fx::particles::ParticleSet;
use swarm_fx::text_sampler::SampledText;
use swarm_fx::PhaseBoundaries;

fn sweep(b: &PhaseBoundaries) -> Vec<MorphState> {
    (0..=100).map(|i| MorphState::at(i as f32 / 100.0, b)).collect()
}

#[test]
fn opacity_trace_is_smooth_and_closed() {
    let b = PhaseBoundaries::default();
    let trace = sweep(&b);
    let limit = 0.01 * b.steepest_slope() + 1e-4;

    assert_eq!(trace.first().map(|s| s.opacity), Some(0.0));
    assert_eq!(trace.last().map(|s| s.opacity), Some(0.0));
    for pair in trace.windows(2) {
        assert!(pair[0].opacity >= 0.0 && pair[1].opacity >= 0.0);
        let jump = (pair[1].opacity - pair[0].opacity).abs();
        assert!(
            jump <= limit,
            "opacity jumps {jump} between {} and {}",
            pair[0].progress,
            pair[1].progress
        );
        let morph_jump = (pair[1].morph - pair[0].morph).abs();
        assert!(morph_jump <= limit, "morph jumps {morph_jump} at {}", pair[1].progress);
    }
}

#[test]
fn sweep_visits_every_phase_in_order() {
    let trace = sweep(&PhaseBoundaries::default());
    let mut phases: Vec<MorphPhase> = Vec::new();
    for s in &trace {
        if phases.last() != Some(&s.phase) {
            phases.push(s.phase);
        }
    }
    assert_eq!(phases, MorphPhase::ALL.to_vec());
}

#[test]
fn held_midpoint_resolves_every_particle() {
    let b = PhaseBoundaries::default();
    let state = MorphState::at(b.held_midpoint(), &b);
    assert_eq!(state.phase, MorphPhase::Held);
    assert_eq!((state.morph, state.opacity), (1.0, 1.0));

    let sample = SampledText {
        points: (0..400)
            .map(|i| Vec2::new((i % 40) as f32 * 2.0 - 40.0, (i / 40) as f32 * 2.0 - 10.0))
            .collect(),
        width: 120.0,
        height: 90.4,
    };
    let set = ParticleSet::from_sample(&sample, &mut StdRng::seed_from_u64(9));
    for max in [0.0, 0.3, 0.6, 0.95] {
        let stagger = Stagger::new(max);
        for record in set.records() {
            let sprite = particle_at(record, &state, stagger, 12.5);
            assert_eq!(sprite.eased, 1.0);
            assert!((sprite.alpha - 1.0).abs() < 1e-6);
            // Only the idle jitter separates the sprite from its target.
            assert!((sprite.position - record.target).length() <= 0.3 * 2f32.sqrt() + 1e-4);
        }
    }
}

#[test]
fn invisible_states_produce_no_sprites() {
    let b = PhaseBoundaries::default();
    let sample = SampledText {
        points: vec![Vec2::ZERO; 16],
        width: 50.0,
        height: 50.0,
    };
    let set = ParticleSet::from_sample(&sample, &mut StdRng::seed_from_u64(10));
    let mut sprites = Vec::new();
    for p in [0.0, 0.05, 0.5, 1.0] {
        update_sprites(&set, &MorphState::at(p, &b), Stagger::default(), 0.0, &mut sprites);
        assert!(sprites.is_empty(), "sprites at progress {p}");
    }
    update_sprites(&set, &MorphState::at(0.39, &b), Stagger::default(), 0.0, &mut sprites);
    assert_eq!(sprites.len(), 16);
}
