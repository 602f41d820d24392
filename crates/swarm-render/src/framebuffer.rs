#![forbid(unsafe_code)]

//! CPU RGBA framebuffer.
//!
//! Effects draw into a row-major `width * height` buffer of [`PackedRgba`].
//! The web frontend uploads it with `putImageData`; the harness writes it to
//! PNG. All drawing clips silently at the edges, so callers can throw
//! off-screen particles at it without bounds checks.

use std::ops::RangeInclusive;

use swarm_core::animation::smoothstep;

use crate::blend::BlendMode;
use crate::color::PackedRgba;

/// Row-major RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

impl Framebuffer {
    /// Create a transparent framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PackedRgba::TRANSPARENT; (width as usize) * (height as usize)],
        }
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the buffer has no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Row-major pixels.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// Resize, clearing to transparent. Reuses the allocation when shrinking.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize((width as usize) * (height as usize), PackedRgba::TRANSPARENT);
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
    }

    /// Read a pixel; out-of-bounds reads are transparent.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> PackedRgba {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize]
        } else {
            PackedRgba::TRANSPARENT
        }
    }

    /// Overwrite a pixel (no blending).
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: PackedRgba) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Blend `color` onto the pixel at signed coordinates.
    #[inline]
    pub fn blend(&mut self, x: i64, y: i64, color: PackedRgba, mode: BlendMode) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.pixels[idx] = mode.blend(color, self.pixels[idx]);
    }

    /// Draw a round point sprite with a soft edge and a bright core.
    ///
    /// Pixel coverage inside the sprite is `1 - smoothstep(0.3, 0.5, d)` where
    /// `d` is the distance from the center in units of `diameter`; pixels past
    /// `d = 0.5` are skipped. The core adds `core_boost * smoothstep(0.2, 0, d)`
    /// to every channel, pushing the center toward white.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_soft_point(
        &mut self,
        cx: f32,
        cy: f32,
        diameter: f32,
        base: PackedRgba,
        alpha: f32,
        core_boost: f32,
        mode: BlendMode,
    ) {
        if !(diameter > 0.0) || !(alpha > 0.0) || !cx.is_finite() || !cy.is_finite() {
            return;
        }
        let radius = diameter * 0.5;
        let Some((xs, ys)) = self.clip_disc(cx, cy, radius) else {
            return;
        };

        let inv_d = 1.0 / diameter;
        let (br, bg, bb) = (
            base.r() as f32 / 255.0,
            base.g() as f32 / 255.0,
            base.b() as f32 / 255.0,
        );
        for py in ys {
            let dy = (py as f32 + 0.5 - cy) * inv_d;
            for px in xs.clone() {
                let dx = (px as f32 + 0.5 - cx) * inv_d;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist > 0.5 {
                    continue;
                }
                let coverage = 1.0 - smoothstep(0.3, 0.5, dist);
                let boost = smoothstep(0.2, 0.0, dist) * core_boost;
                let color = PackedRgba::from_unit(
                    br + boost,
                    bg + boost,
                    bb + boost,
                    coverage * alpha,
                );
                self.blend(px, py, color, mode);
            }
        }
    }

    /// Fill an anti-aliased circle (one-pixel soft edge), like a canvas
    /// `arc` + `fill`.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: PackedRgba, mode: BlendMode) {
        if !(radius > 0.0) || !cx.is_finite() || !cy.is_finite() || color.a() == 0 {
            return;
        }
        let Some((xs, ys)) = self.clip_disc(cx, cy, radius + 1.0) else {
            return;
        };
        for py in ys {
            let dy = py as f32 + 0.5 - cy;
            for px in xs.clone() {
                let dx = px as f32 + 0.5 - cx;
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                self.blend(px, py, color.with_opacity(coverage), mode);
            }
        }
    }

    /// Pixel columns and rows of the disc's bounding box that lie inside the
    /// buffer, or `None` when the disc misses it entirely.
    fn clip_disc(
        &self,
        cx: f32,
        cy: f32,
        radius: f32,
    ) -> Option<(RangeInclusive<i64>, RangeInclusive<i64>)> {
        let xs = clip_span(cx - radius, cx + radius, self.width)?;
        let ys = clip_span(cy - radius, cy + radius, self.height)?;
        Some((xs, ys))
    }

    /// Draw a one-pixel line with a DDA walk.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: PackedRgba, mode: BlendMode) {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) || color.a() == 0 {
            return;
        }
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        // Bound the walk so a wild projection cannot stall a frame.
        let limit = f32::from(u16::MAX);
        if steps > limit {
            return;
        }
        let (sx, sy) = (dx / steps, dy / steps);
        let mut last = None;
        for i in 0..=(steps as u32) {
            let x = (x0 + sx * i as f32).floor() as i64;
            let y = (y0 + sy * i as f32).floor() as i64;
            if last == Some((x, y)) {
                continue;
            }
            last = Some((x, y));
            self.blend(x, y, color, mode);
        }
    }

    /// Copy pixels into `out` as `[r, g, b, a]` bytes (canvas `ImageData`
    /// layout). `out` is resized as needed and reused across frames.
    pub fn write_rgba_bytes(&self, out: &mut Vec<u8>) {
        out.clear();
        out.reserve(self.pixels.len() * 4);
        for px in &self.pixels {
            out.extend_from_slice(&px.to_rgba_bytes());
        }
    }

    /// Count pixels with non-zero alpha.
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| p.a() > 0).count()
    }
}

/// `[lo, hi]` widened to whole pixels and clamped to `0..extent`.
fn clip_span(lo: f32, hi: f32, extent: u32) -> Option<RangeInclusive<i64>> {
    let first = (lo.floor() as i64).max(0);
    let last = (hi.ceil() as i64).min(i64::from(extent) - 1);
    (first <= last).then_some(first..=last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_buffer_accepts_draws() {
        let mut fb = Framebuffer::new(0, 0);
        fb.draw_soft_point(0.0, 0.0, 4.0, PackedRgba::WHITE, 1.0, 0.3, BlendMode::Additive);
        fb.fill_circle(0.0, 0.0, 3.0, PackedRgba::WHITE, BlendMode::Over);
        fb.draw_line(-5.0, -5.0, 5.0, 5.0, PackedRgba::WHITE, BlendMode::Over);
        assert!(fb.is_empty());
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn soft_point_center_is_brightest() {
        let mut fb = Framebuffer::new(16, 16);
        fb.draw_soft_point(8.0, 8.0, 8.0, PackedRgba::ACCENT_CYAN, 1.0, 0.3, BlendMode::Additive);
        let center = fb.get(7, 7);
        let edge = fb.get(5, 7);
        assert!(center.a() > edge.a());
        assert!(center.r() > 0, "core boost should lift red off zero");
        assert_eq!(fb.get(0, 0).a(), 0);
    }

    #[test]
    fn soft_point_off_screen_is_clipped() {
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_soft_point(-50.0, 4.0, 6.0, PackedRgba::WHITE, 1.0, 0.0, BlendMode::Additive);
        fb.draw_soft_point(f32::NAN, 4.0, 6.0, PackedRgba::WHITE, 1.0, 0.0, BlendMode::Additive);
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn zero_alpha_point_draws_nothing() {
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_soft_point(4.0, 4.0, 6.0, PackedRgba::WHITE, 0.0, 0.3, BlendMode::Additive);
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn circle_covers_its_center() {
        let mut fb = Framebuffer::new(10, 10);
        fb.fill_circle(5.0, 5.0, 2.0, PackedRgba::CYAN, BlendMode::Over);
        assert_eq!(fb.get(5, 5), PackedRgba::CYAN);
        assert_eq!(fb.get(0, 0).a(), 0);
    }

    #[test]
    fn line_touches_both_endpoints() {
        let mut fb = Framebuffer::new(10, 10);
        fb.draw_line(1.0, 1.0, 8.0, 6.0, PackedRgba::WHITE, BlendMode::Over);
        assert_eq!(fb.get(1, 1), PackedRgba::WHITE);
        assert_eq!(fb.get(8, 6), PackedRgba::WHITE);
    }

    #[test]
    fn resize_clears() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear(PackedRgba::WHITE);
        fb.resize(2, 3);
        assert_eq!(fb.pixels().len(), 6);
        assert_eq!(fb.lit_pixels(), 0);
    }

    #[test]
    fn rgba_bytes_match_pixels() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set(1, 0, PackedRgba::rgba(1, 2, 3, 4));
        let mut bytes = Vec::new();
        fb.write_rgba_bytes(&mut bytes);
        assert_eq!(bytes, vec![0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn discs_clip_to_the_buffer() {
        assert_eq!(clip_span(-3.2, 2.5, 10), Some(0..=3));
        assert_eq!(clip_span(7.5, 40.0, 10), Some(7..=9));
        assert_eq!(clip_span(-9.0, -1.5, 10), None);
        assert_eq!(clip_span(0.0, 4.0, 0), None);
        assert_eq!(clip_span(-1e30, 1e30, 4), Some(0..=3));
    }

    #[test]
    fn huge_discs_touch_only_buffer_pixels() {
        // A radius this large would be ~1e12 iterations unclipped.
        let mut fb = Framebuffer::new(8, 8);
        fb.fill_circle(4.0, 4.0, 1.0e6, PackedRgba::CYAN, BlendMode::Over);
        assert_eq!(fb.lit_pixels(), 64);
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_soft_point(4.0, 4.0, 2.0e6, PackedRgba::CYAN, 1.0, 0.0, BlendMode::Additive);
        assert_eq!(fb.lit_pixels(), 64);
    }
}
