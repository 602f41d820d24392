#![forbid(unsafe_code)]

//! Text rasterization for the sampler.
//!
//! The sampler only needs two things from a font backend: the advance width
//! of a string, and an alpha coverage bitmap with the string drawn centered.
//! [`TextRasterizer`] captures exactly that, so the browser canvas and the
//! built-in [`BitmapFontRasterizer`] are interchangeable.

use std::fmt;

/// Largest bitmap a rasterizer will allocate (in pixels).
pub const MAX_BITMAP_PIXELS: u64 = 16 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Font + bitmap types
// ---------------------------------------------------------------------------

/// Font request: family, pixel size, weight.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f32,
    pub bold: bool,
}

impl FontSpec {
    /// Bold font of `size_px` in `family`.
    pub fn bold(family: impl Into<String>, size_px: f32) -> Self {
        Self {
            family: family.into(),
            size_px,
            bold: true,
        }
    }

    /// CSS shorthand, e.g. `bold 36px "Geist Sans", sans-serif`.
    #[must_use]
    pub fn css(&self) -> String {
        let weight = if self.bold { "bold " } else { "" };
        format!("{weight}{}px \"{}\", sans-serif", self.size_px, self.family)
    }

    /// Reject sizes a backend cannot draw.
    pub fn check(&self) -> Result<(), RasterError> {
        if self.size_px.is_finite() && self.size_px > 0.0 {
            Ok(())
        } else {
            Err(RasterError::InvalidFontSize(self.size_px))
        }
    }
}

/// Single-channel coverage bitmap, row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaBitmap {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaBitmap {
    /// Blank bitmap.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            alpha: vec![0; (width as usize) * (height as usize)],
        })
    }

    /// Wrap existing coverage data.
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self, RasterError> {
        check_dimensions(width, height)?;
        let expected = (width as usize) * (height as usize);
        if alpha.len() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Extract the alpha channel from RGBA bytes (canvas `ImageData` layout).
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, RasterError> {
        check_dimensions(width, height)?;
        let expected = (width as usize) * (height as usize) * 4;
        if rgba.len() != expected {
            return Err(RasterError::SizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at (x, y); 0 outside the bitmap.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x < self.width && y < self.height {
            self.alpha[(y as usize) * (self.width as usize) + x as usize]
        } else {
            0
        }
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.alpha[(y as usize) * (self.width as usize) + x as usize] = value;
        }
    }

    /// Pixels whose coverage exceeds `threshold`.
    #[must_use]
    pub fn count_above(&self, threshold: u8) -> usize {
        self.alpha.iter().filter(|&&a| a > threshold).count()
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), RasterError> {
    if u64::from(width) * u64::from(height) > MAX_BITMAP_PIXELS {
        return Err(RasterError::BitmapTooLarge { width, height });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a rasterizer could not produce coverage.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterError {
    /// No 2D drawing context could be obtained.
    NoContext,
    /// Font size was zero, negative, or not finite.
    InvalidFontSize(f32),
    /// Requested bitmap exceeds [`MAX_BITMAP_PIXELS`].
    BitmapTooLarge { width: u32, height: u32 },
    /// Backing data had the wrong length.
    SizeMismatch { expected: usize, actual: usize },
    /// Host API failure, with its message.
    Backend(String),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoContext => write!(f, "no 2d rendering context available"),
            Self::InvalidFontSize(size) => write!(f, "invalid font size {size}"),
            Self::BitmapTooLarge { width, height } => {
                write!(f, "bitmap {width}x{height} exceeds {MAX_BITMAP_PIXELS} pixels")
            }
            Self::SizeMismatch { expected, actual } => {
                write!(f, "bitmap data has {actual} bytes, expected {expected}")
            }
            Self::Backend(msg) => write!(f, "rasterizer backend error: {msg}"),
        }
    }
}

impl std::error::Error for RasterError {}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A font backend able to measure and draw a single line of text.
pub trait TextRasterizer {
    /// Advance width of `text` in pixels.
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Result<f32, RasterError>;

    /// Draw `text` centered horizontally and vertically (middle baseline)
    /// into a fresh `width x height` coverage bitmap.
    fn rasterize(
        &mut self,
        text: &str,
        font: &FontSpec,
        width: u32,
        height: u32,
    ) -> Result<AlphaBitmap, RasterError>;
}

impl<T: TextRasterizer + ?Sized> TextRasterizer for &mut T {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Result<f32, RasterError> {
        (**self).measure_text(text, font)
    }

    fn rasterize(
        &mut self,
        text: &str,
        font: &FontSpec,
        width: u32,
        height: u32,
    ) -> Result<AlphaBitmap, RasterError> {
        (**self).rasterize(text, font, width, height)
    }
}

// ---------------------------------------------------------------------------
// Built-in dot-matrix face
// ---------------------------------------------------------------------------

/// Glyph cell width in dots.
pub const GLYPH_COLS: u32 = 5;
/// Glyph cell height in dots.
pub const GLYPH_ROWS: u32 = 7;
/// Horizontal advance per glyph in dots (one dot of spacing).
pub const GLYPH_ADVANCE: u32 = GLYPH_COLS + 1;

/// Rendered for characters the face does not cover.
const MISSING_GLYPH: [u8; 7] = [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F];

/// Rows top to bottom; bit 4 is the leftmost column.
fn glyph_rows(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        ' ' => [0; 7],
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '+' => [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
        '%' => [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        _ => MISSING_GLYPH,
    }
}

/// Deterministic 5x7 dot-matrix rasterizer.
///
/// One dot is `size_px / 10` pixels square, so a 36px request yields glyphs
/// about 25px tall. The face is caps-only: lowercase maps to uppercase and
/// anything else outside the table draws as a hollow box. Bold widens every
/// dot to the right by a third of a dot (at least one pixel).
///
/// Coverage is binary (0 or 255), which makes sample counts reproducible
/// across platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFontRasterizer;

impl BitmapFontRasterizer {
    pub const fn new() -> Self {
        Self
    }

    fn dot_size(font: &FontSpec) -> f32 {
        font.size_px / 10.0
    }

    fn bold_extra(font: &FontSpec) -> f32 {
        if font.bold {
            (Self::dot_size(font) / 3.0).max(1.0)
        } else {
            0.0
        }
    }

    fn line_width(text: &str, font: &FontSpec) -> f32 {
        let glyphs = text.chars().count() as f32;
        if glyphs == 0.0 {
            return 0.0;
        }
        let dot = Self::dot_size(font);
        // No spacing column after the last glyph.
        glyphs * GLYPH_ADVANCE as f32 * dot - dot + Self::bold_extra(font)
    }
}

impl TextRasterizer for BitmapFontRasterizer {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Result<f32, RasterError> {
        font.check()?;
        Ok(Self::line_width(text, font))
    }

    fn rasterize(
        &mut self,
        text: &str,
        font: &FontSpec,
        width: u32,
        height: u32,
    ) -> Result<AlphaBitmap, RasterError> {
        font.check()?;
        let mut bitmap = AlphaBitmap::new(width, height)?;
        let dot = Self::dot_size(font);
        let bold = Self::bold_extra(font);
        let origin_x = (width as f32 - Self::line_width(text, font)) * 0.5;
        let origin_y = (height as f32 - GLYPH_ROWS as f32 * dot) * 0.5;

        for (index, ch) in text.chars().enumerate() {
            let glyph_x = origin_x + (index as u32 * GLYPH_ADVANCE) as f32 * dot;
            for (row, bits) in glyph_rows(ch).iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if bits & (1 << (GLYPH_COLS - 1 - col)) == 0 {
                        continue;
                    }
                    let x0 = glyph_x + col as f32 * dot;
                    let y0 = origin_y + row as f32 * dot;
                    fill_rect(&mut bitmap, x0, y0, x0 + dot + bold, y0 + dot);
                }
            }
        }
        Ok(bitmap)
    }
}

/// Set every pixel whose center lies inside `[x0, x1) x [y0, y1)`.
fn fill_rect(bitmap: &mut AlphaBitmap, x0: f32, y0: f32, x1: f32, y1: f32) {
    let px0 = (x0 - 0.5).ceil().max(0.0) as u32;
    let py0 = (y0 - 0.5).ceil().max(0.0) as u32;
    let px1 = (x1 - 0.5).ceil().clamp(0.0, bitmap.width() as f32) as u32;
    let py1 = (y1 - 0.5).ceil().clamp(0.0, bitmap.height() as f32) as u32;
    for y in py0..py1 {
        for x in px0..px1 {
            bitmap.set(x, y, 255);
        }
    }
}
