#![forbid(unsafe_code)]

//! WASM frontend for glyphswarm.
//!
//! Exposes these `wasm-bindgen` classes:
//! - `SwarmOverlayWeb`: the full-page particle-text overlay. It samples each
//!   tracked section's heading on an offscreen canvas once `document.fonts`
//!   is ready, then reads section rects every frame.
//! - `SwarmFieldWeb`: the edge-to-center field behind a section.
//! - `SwarmNetworkWeb`: the hero node network.
//!
//! Those three draw into a [`swarm_render::Framebuffer`] and blit it with
//! `putImageData`. Two more drive DOM styles rather than a canvas:
//! - `SwarmSectionWeb`: a section's scroll reveal (opacity, offset, blur).
//! - `SwarmStatsWeb`: the about-section count-up figures.

pub mod options;
pub mod page;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{
    CanvasRasterizer, SwarmFieldWeb, SwarmNetworkWeb, SwarmOverlayWeb, SwarmSectionWeb,
    SwarmStatsWeb,
};

pub use options::WebOptions;
pub use page::{SectionReveal, StatsBoard};

/// Placeholder on non-wasm targets; the browser classes need `web-sys`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SwarmOverlayWeb;

#[cfg(not(target_arch = "wasm32"))]
impl SwarmOverlayWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
