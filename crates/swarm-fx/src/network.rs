#![forbid(unsafe_code)]

//! Hero backdrop: a slowly turning ball of linked nodes.
//!
//! Nodes fill a sphere uniformly by volume. Each node links to up to three
//! nearest neighbours within a fixed reach, keeping only `i < j` edges so
//! every link is stored once. The frame is time-driven: the whole ball spins
//! about the vertical axis, nodes bob individually, and node opacity
//! breathes. Lines are dropped at reduced quality.

use std::f32::consts::TAU;

use glam::{Mat3, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use swarm_render::{BlendMode, Framebuffer, PackedRgba};

use crate::fx::{FxContext, FxQuality, ParticleFx};

/// Network tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkParams {
    pub nodes: usize,
    /// Node count at reduced quality.
    pub nodes_reduced: usize,
    /// Sphere radius in world units.
    pub radius: f32,
    pub max_neighbors: usize,
    /// Longest allowed link in world units.
    pub max_distance: f32,
    /// Spin rate in radians per second.
    pub spin: f32,
    /// Vertical bob amplitude in world units.
    pub bob: f32,
    /// Camera distance from the origin along +z.
    pub camera_distance: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Node diameter in world units (perspective-scaled).
    pub node_size: f32,
    pub line_alpha: f32,
    pub color: PackedRgba,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            nodes: 100,
            nodes_reduced: 40,
            radius: 4.0,
            max_neighbors: 3,
            max_distance: 2.2,
            spin: 0.05,
            bob: 0.08,
            camera_distance: 8.0,
            fov_degrees: 60.0,
            node_size: 0.06,
            line_alpha: 0.15,
            color: PackedRgba::ACCENT_CYAN,
        }
    }
}

/// Node opacity at time `t`.
#[inline]
#[must_use]
pub fn node_opacity(t: f32) -> f32 {
    0.7 + (t * 1.5).sin() * 0.15
}

/// Random node positions plus nearest-neighbour edges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkGraph {
    pub nodes: Vec<Vec3>,
    /// Pairs `(i, j)` with `i < j`, no duplicates.
    pub edges: Vec<(u32, u32)>,
}

impl NetworkGraph {
    /// Build a graph of `count` nodes.
    pub fn build<G: Rng + ?Sized>(count: usize, params: &NetworkParams, rng: &mut G) -> Self {
        let nodes: Vec<Vec3> = (0..count)
            .map(|_| {
                let theta = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
                let phi = rng.random::<f32>() * TAU;
                let r = params.radius * rng.random::<f32>().cbrt();
                Vec3::new(
                    r * theta.sin() * phi.cos(),
                    r * theta.sin() * phi.sin(),
                    r * theta.cos(),
                )
            })
            .collect();

        let mut edges = Vec::new();
        let mut near: Vec<(usize, f32)> = Vec::new();
        for (i, a) in nodes.iter().enumerate() {
            near.clear();
            near.extend(
                nodes
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != i)
                    .map(|(j, b)| (j, a.distance(*b)))
                    .filter(|&(_, d)| d < params.max_distance),
            );
            near.sort_by(|x, y| x.1.total_cmp(&y.1));
            for &(j, _) in near.iter().take(params.max_neighbors) {
                if i < j {
                    edges.push((i as u32, j as u32));
                }
            }
        }
        edges.sort_unstable();
        edges.dedup();
        Self { nodes, edges }
    }
}

/// Perspective camera looking down -z from `(0, 0, distance)`.
#[derive(Debug, Clone, Copy)]
struct Camera {
    distance: f32,
    focal: f32,
    aspect: f32,
    half_w: f32,
    half_h: f32,
}

impl Camera {
    fn new(params: &NetworkParams, width: f32, height: f32) -> Self {
        let focal = 1.0 / (params.fov_degrees.to_radians() * 0.5).tan();
        Self {
            distance: params.camera_distance,
            focal,
            aspect: if height > 0.0 { width / height } else { 1.0 },
            half_w: width * 0.5,
            half_h: height * 0.5,
        }
    }

    /// Screen position (px, y down) and depth, or `None` behind the camera.
    fn project(&self, p: Vec3) -> Option<(f32, f32, f32)> {
        let depth = self.distance - p.z;
        if depth <= 1e-3 {
            return None;
        }
        let ndc_x = p.x * self.focal / (self.aspect * depth);
        let ndc_y = p.y * self.focal / depth;
        Some((
            (ndc_x + 1.0) * self.half_w,
            (1.0 - ndc_y) * self.half_h,
            depth,
        ))
    }
}

/// The spinning node network.
#[derive(Debug, Clone)]
pub struct ParticleNetwork {
    params: NetworkParams,
    graph: NetworkGraph,
    reduced: bool,
    rng: StdRng,
}

impl ParticleNetwork {
    /// Full-detail network.
    pub fn new(params: NetworkParams, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let graph = NetworkGraph::build(params.nodes, &params, &mut rng);
        Self {
            params,
            graph,
            reduced: false,
            rng,
        }
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Switch detail level, rebuilding the graph when the node count changes.
    pub fn set_reduced(&mut self, reduced: bool) {
        if reduced == self.reduced {
            return;
        }
        self.reduced = reduced;
        let count = if reduced {
            self.params.nodes_reduced
        } else {
            self.params.nodes
        };
        self.graph = NetworkGraph::build(count, &self.params, &mut self.rng);
    }

    /// Draw at time `t` (seconds) into a framebuffer of device pixels.
    pub fn draw(&self, fb: &mut Framebuffer, t: f32) {
        let (w, h) = (fb.width() as f32, fb.height() as f32);
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let camera = Camera::new(&self.params, w, h);
        let spin = Mat3::from_rotation_y(t * self.params.spin);

        if !self.reduced {
            let line = self.params.color.with_opacity(self.params.line_alpha);
            for &(i, j) in &self.graph.edges {
                let a = camera.project(spin * self.graph.nodes[i as usize]);
                let b = camera.project(spin * self.graph.nodes[j as usize]);
                if let (Some((ax, ay, _)), Some((bx, by, _))) = (a, b) {
                    fb.draw_line(ax, ay, bx, by, line, BlendMode::Over);
                }
            }
        }

        let node = self.params.color.with_opacity(node_opacity(t));
        for (i, base) in self.graph.nodes.iter().enumerate() {
            let bobbed = *base + Vec3::Y * ((t + i as f32 * 0.3).sin() * self.params.bob);
            if let Some((x, y, depth)) = camera.project(spin * bobbed) {
                // Perspective point size: world size scaled by half the
                // viewport height over depth.
                let diameter = self.params.node_size * camera.half_h / depth;
                fb.fill_circle(x, y, (diameter * 0.5).max(0.5), node, BlendMode::Over);
            }
        }
    }
}

impl ParticleFx for ParticleNetwork {
    fn name(&self) -> &'static str {
        "particle-network"
    }

    fn render(&mut self, ctx: &FxContext, fb: &mut Framebuffer) {
        match ctx.quality {
            FxQuality::Off => return,
            FxQuality::Reduced => self.set_reduced(true),
            FxQuality::Full => self.set_reduced(false),
        }
        self.draw(fb, ctx.time_seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_stay_inside_sphere() {
        let params = NetworkParams::default();
        let g = NetworkGraph::build(200, &params, &mut StdRng::seed_from_u64(5));
        assert_eq!(g.nodes.len(), 200);
        assert!(g.nodes.iter().all(|n| n.length() <= params.radius + 1e-4));
    }

    #[test]
    fn edges_are_short_ordered_and_unique() {
        let params = NetworkParams::default();
        let g = NetworkGraph::build(100, &params, &mut StdRng::seed_from_u64(6));
        assert!(!g.edges.is_empty());
        let mut seen = std::collections::HashSet::new();
        for &(i, j) in &g.edges {
            assert!(i < j);
            assert!(seen.insert((i, j)));
            let d = g.nodes[i as usize].distance(g.nodes[j as usize]);
            assert!(d < params.max_distance);
        }
    }

    #[test]
    fn each_node_starts_at_most_max_neighbors_edges() {
        let params = NetworkParams::default();
        let g = NetworkGraph::build(100, &params, &mut StdRng::seed_from_u64(7));
        for i in 0..100u32 {
            let owned = g.edges.iter().filter(|e| e.0 == i).count();
            assert!(owned <= params.max_neighbors);
        }
    }

    #[test]
    fn opacity_breathes_within_bounds() {
        for i in 0..100 {
            let o = node_opacity(i as f32 * 0.1);
            assert!((0.55..=0.85).contains(&o));
        }
    }

    #[test]
    fn reduced_quality_rebuilds_smaller() {
        let mut net = ParticleNetwork::new(NetworkParams::default(), 8);
        assert_eq!(net.graph().nodes.len(), 100);
        let mut fb = Framebuffer::new(320, 200);
        let ctx = FxContext {
            width: 320.0,
            height: 200.0,
            pixel_ratio: 1.0,
            time_seconds: 2.0,
            progress: 0.0,
            quality: FxQuality::Reduced,
        };
        net.render(&ctx, &mut fb);
        assert!(net.is_reduced());
        assert_eq!(net.graph().nodes.len(), 40);
        assert!(fb.lit_pixels() > 0);
    }

    #[test]
    fn projection_centers_origin() {
        let cam = Camera::new(&NetworkParams::default(), 200.0, 100.0);
        let (x, y, depth) = cam.project(Vec3::ZERO).unwrap();
        assert_eq!((x, y, depth), (100.0, 50.0, 8.0));
        assert!(cam.project(Vec3::new(0.0, 0.0, 9.0)).is_none());
    }
}
