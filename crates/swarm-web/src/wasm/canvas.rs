#![forbid(unsafe_code)]

use swarm_fx::raster::{AlphaBitmap, FontSpec, RasterError, TextRasterizer};
use swarm_render::Framebuffer;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use super::document;

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("2d context has unexpected type"))
}

fn backend(err: JsValue) -> RasterError {
    RasterError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Text rasterizer backed by an offscreen `<canvas>`.
///
/// Text is drawn white, centered, with a middle baseline; only the alpha
/// channel of the readback is kept.
pub struct CanvasRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRasterizer {
    pub fn new() -> Result<Self, RasterError> {
        let canvas = document()
            .and_then(|doc| doc.create_element("canvas"))
            .map_err(|_| RasterError::NoContext)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| RasterError::NoContext)?;
        let ctx = context_2d(&canvas).map_err(|_| RasterError::NoContext)?;
        Ok(Self { canvas, ctx })
    }
}

impl TextRasterizer for CanvasRasterizer {
    fn measure_text(&mut self, text: &str, font: &FontSpec) -> Result<f32, RasterError> {
        font.check()?;
        self.ctx.set_font(&font.css());
        let metrics = self.ctx.measure_text(text).map_err(backend)?;
        Ok(metrics.width() as f32)
    }

    fn rasterize(
        &mut self,
        text: &str,
        font: &FontSpec,
        width: u32,
        height: u32,
    ) -> Result<AlphaBitmap, RasterError> {
        font.check()?;
        let blank = AlphaBitmap::new(width, height)?;
        if width == 0 || height == 0 {
            return Ok(blank);
        }
        // Resizing resets the context state, so style after it.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, f64::from(width), f64::from(height));
        ctx.set_font(&font.css());
        ctx.set_fill_style_str("#ffffff");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(text, f64::from(width) / 2.0, f64::from(height) / 2.0)
            .map_err(backend)?;
        let data = ctx
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .map_err(backend)?
            .data();
        AlphaBitmap::from_rgba(width, height, &data.0)
    }
}

/// A visible canvas plus the framebuffer blitted into it.
pub(super) struct CanvasTarget {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    fb: Framebuffer,
    bytes: Vec<u8>,
}

impl CanvasTarget {
    pub(super) fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        let fb = Framebuffer::new(canvas.width(), canvas.height());
        Ok(Self {
            canvas,
            ctx,
            fb,
            bytes: Vec::new(),
        })
    }

    /// Size the backing store to `width x height` CSS px at `pixel_ratio`.
    pub(super) fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        let device = |v: f32| (v * pixel_ratio).floor().max(0.0) as u32;
        let (w, h) = (device(width), device(height));
        if (w, h) != (self.fb.width(), self.fb.height()) {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
            self.fb.resize(w, h);
        }
    }

    pub(super) fn framebuffer(&mut self) -> &mut Framebuffer {
        self.fb.clear(swarm_render::PackedRgba::TRANSPARENT);
        &mut self.fb
    }

    /// Copy the framebuffer to the canvas.
    pub(super) fn present(&mut self) -> Result<(), JsValue> {
        if self.fb.is_empty() {
            return Ok(());
        }
        self.fb.write_rgba_bytes(&mut self.bytes);
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(self.bytes.as_slice()),
            self.fb.width(),
            self.fb.height(),
        )?;
        self.ctx.put_image_data(&image, 0.0, 0.0)
    }

    /// Blank the visible canvas.
    pub(super) fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
    }
}
