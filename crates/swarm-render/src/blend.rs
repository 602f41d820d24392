#![forbid(unsafe_code)]

//! Blend modes used when drawing into a [`Framebuffer`](crate::Framebuffer).

use crate::color::PackedRgba;

/// How a drawn color combines with what is already in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Standard alpha-over blending (canvas `source-over`).
    #[default]
    Over,
    /// Additive blending: color scaled by alpha is added to the destination.
    /// Overlapping particles brighten toward white.
    Additive,
}

impl BlendMode {
    /// Blend `top` onto `bottom`.
    #[inline]
    pub fn blend(self, top: PackedRgba, bottom: PackedRgba) -> PackedRgba {
        match self {
            Self::Over => top.over(bottom),
            Self::Additive => blend_additive(top, bottom),
        }
    }
}

#[inline]
fn blend_additive(top: PackedRgba, bottom: PackedRgba) -> PackedRgba {
    let ta = top.a() as f32 / 255.0;
    let add = |b: u8, t: u8| (b as f32 + t as f32 * ta).min(255.0) as u8;
    // Coverage accumulates too, so a transparent overlay gains alpha where
    // particles land.
    let a = (bottom.a() as u16 + top.a() as u16).min(255) as u8;
    PackedRgba::rgba(
        add(bottom.r(), top.r()),
        add(bottom.g(), top.g()),
        add(bottom.b(), top.b()),
        a,
    )
}
