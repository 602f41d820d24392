#![forbid(unsafe_code)]

//! Render kernel for glyphswarm: packed colors, blend modes, and a CPU RGBA
//! framebuffer with the handful of primitives the particle effects need
//! (soft point sprites, filled circles, alpha lines).

pub mod blend;
pub mod color;
pub mod framebuffer;

pub use blend::BlendMode;
pub use color::PackedRgba;
pub use framebuffer::Framebuffer;
