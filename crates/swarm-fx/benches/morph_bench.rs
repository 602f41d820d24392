//! Benchmarks for the per-frame morph update and sprite drawing.
//!
//! Run with: cargo bench -p swarm-fx --bench morph_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;
use swarm_core::animation::stagger::Stagger;
use swarm_fx::PhaseBoundaries;
use swarm_fx::morph::{MorphState, SpriteStyle, draw_sprites, update_sprites};
use swarm_fx::particles::ParticleSet;
use swarm_fx::text_sampler::SampledText;
use swarm_render::Framebuffer;

fn particle_set(n: usize) -> ParticleSet {
    let sample = SampledText {
        points: (0..n)
            .map(|i| Vec2::new((i % 200) as f32 - 100.0, (i / 200) as f32 - 5.0))
            .collect(),
        width: 240.0,
        height: 90.0,
    };
    ParticleSet::from_sample(&sample, &mut StdRng::seed_from_u64(7))
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("morph/update");
    let phases = PhaseBoundaries::default();
    for n in [1000usize, 2000] {
        let set = particle_set(n);
        let state = MorphState::at(0.3, &phases);
        let mut sprites = Vec::with_capacity(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("converging", n), &set, |b, set| {
            b.iter(|| {
                update_sprites(set, &state, Stagger::default(), black_box(3.2), &mut sprites);
                black_box(&sprites);
            })
        });
    }
    group.finish();
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("morph/draw");
    let set = particle_set(2000);
    let state = MorphState::at(0.39, &PhaseBoundaries::default());
    let mut sprites = Vec::new();
    update_sprites(&set, &state, Stagger::default(), 1.0, &mut sprites);
    let style = SpriteStyle {
        pixel_ratio: 1.5,
        ..SpriteStyle::default()
    };
    let mut fb = Framebuffer::new(1920, 1200);
    group.throughput(Throughput::Elements(sprites.len() as u64));
    group.bench_function("held_2000", |b| {
        b.iter(|| {
            fb.clear(swarm_render::PackedRgba::TRANSPARENT);
            black_box(draw_sprites(&mut fb, &sprites, Vec2::new(640.0, 400.0), &style));
        })
    });
    group.finish();
}

criterion_group!(benches, bench_update, bench_draw);
criterion_main!(benches);
