#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use swarm_fx::overlay::{ParticleOverlay, Viewport};
use swarm_fx::scroll::scroll_progress;
use swarm_fx::text_sampler::sample_when_ready;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{Document, Element, HtmlCanvasElement};

use super::canvas::{CanvasRasterizer, CanvasTarget};
use super::{document, host_seed, prefers_reduced_motion, viewport_metrics};
use crate::options::{WebOptions, section_selectors};

/// Resolves once `document.fonts` reports ready. Failures resolve too: the
/// sampler then measures with whatever font is available.
async fn fonts_ready() {
    match document().and_then(|doc| doc.fonts().ready()) {
        Ok(promise) => {
            if let Err(err) = JsFuture::from(promise).await {
                swarm_core::warn!(error = ?err, "font readiness rejected");
            }
        }
        Err(err) => swarm_core::warn!(error = ?err, "font readiness unavailable"),
    }
}

fn element_center(el: &Element) -> Vec2 {
    let r = el.get_bounding_client_rect();
    Vec2::new(
        (r.left() + r.width() * 0.5) as f32,
        (r.top() + r.height() * 0.5) as f32,
    )
}

fn select(doc: &Document, selector: &str) -> Option<Element> {
    doc.query_selector(selector).ok().flatten()
}

/// Full-page particle-text overlay bound to a fixed, full-viewport
/// `<canvas>`.
///
/// JS drives it: `mount()` once, `resize()` on window resize, and
/// `frame(t)` from `requestAnimationFrame`. Section progress and heading
/// anchors are read from the DOM every frame.
#[wasm_bindgen]
pub struct SwarmOverlayWeb {
    overlay: Rc<RefCell<ParticleOverlay>>,
    target: CanvasTarget,
    diagnostics: String,
    seed: u64,
    batches: u64,
    mounted: bool,
    start_ms: Option<f64>,
}

#[wasm_bindgen]
impl SwarmOverlayWeb {
    /// `options` is an optional JSON string; see the crate docs.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options: Option<String>) -> Result<SwarmOverlayWeb, JsValue> {
        let opts = WebOptions::resolve(options.as_deref());
        let seed = host_seed(opts.seed);
        let mut overlay = ParticleOverlay::new(opts.config.clone(), seed);
        overlay.set_reduced_motion(opts.reduced_motion.unwrap_or_else(prefers_reduced_motion));
        let mut this = Self {
            overlay: Rc::new(RefCell::new(overlay)),
            target: CanvasTarget::new(canvas)?,
            diagnostics: opts.diagnostics_json(),
            seed,
            batches: 0,
            mounted: false,
            start_ms: None,
        };
        this.resize()?;
        Ok(this)
    }

    /// Option problems found at construction, as a JSON array of strings.
    pub fn diagnostics(&self) -> String {
        self.diagnostics.clone()
    }

    /// Whether the effect runs (reduced motion off).
    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.overlay.borrow().is_active()
    }

    /// Re-read the viewport and size the canvas to it.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        let (width, height, dpr) = viewport_metrics()?;
        let pixel_ratio = {
            let mut overlay = self.overlay.borrow_mut();
            overlay.set_viewport(Viewport::new(width, height, dpr));
            overlay.pixel_ratio()
        };
        self.target.resize(width, height, pixel_ratio);
        if self.mounted {
            self.schedule_sampling();
        }
        Ok(())
    }

    /// Start sampling headings once fonts are ready.
    pub fn mount(&mut self) {
        self.mounted = true;
        self.schedule_sampling();
    }

    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.overlay.borrow_mut().set_reduced_motion(reduced);
        if reduced {
            self.target.clear();
        } else if self.mounted {
            self.schedule_sampling();
        }
    }

    /// Change a section's heading text; resamples when it changed.
    #[wasm_bindgen(js_name = setHeading)]
    pub fn set_heading(&mut self, section: &str, heading: &str) -> bool {
        let changed = self.overlay.borrow_mut().set_heading(section, heading);
        if changed && self.mounted {
            self.schedule_sampling();
        }
        changed
    }

    /// `[opacity, offsetY, blur]` for the content under a section heading.
    #[wasm_bindgen(js_name = contentTransform)]
    pub fn content_transform(&self, section: &str) -> Option<Vec<f32>> {
        self.overlay
            .borrow()
            .content_transform(section)
            .map(|t| vec![t.opacity, t.offset_y, t.blur])
    }

    /// Draw one frame. `time_ms` is the `requestAnimationFrame` timestamp.
    pub fn frame(&mut self, time_ms: f64) -> Result<(), JsValue> {
        let start = *self.start_ms.get_or_insert(time_ms);
        let time = ((time_ms - start) / 1000.0) as f32;
        let doc = document()?;
        {
            let mut overlay = self.overlay.borrow_mut();
            if !overlay.is_active() {
                return Ok(());
            }
            let viewport_height = overlay.viewport().height;
            let ids: Vec<String> = overlay
                .groups()
                .iter()
                .map(|g| g.section_id().to_string())
                .collect();
            for id in &ids {
                let (section_sel, heading_sel) = section_selectors(id);
                if let Some(section) = select(&doc, &section_sel) {
                    let r = section.get_bounding_client_rect();
                    overlay.set_progress(
                        id,
                        scroll_progress(r.top() as f32, r.height() as f32, viewport_height),
                    );
                }
                overlay.set_anchor(id, select(&doc, &heading_sel).map(|h| element_center(&h)));
            }
            overlay.render(self.target.framebuffer(), time);
        }
        self.target.present()
    }

    /// Drop every particle set and stop drawing. In-flight samples are
    /// discarded when they land.
    pub fn destroy(&mut self) {
        self.mounted = false;
        self.overlay.borrow_mut().set_reduced_motion(true);
        self.target.clear();
    }
}

impl SwarmOverlayWeb {
    /// Hand outstanding sample requests to an async task.
    fn schedule_sampling(&mut self) {
        let requests = self.overlay.borrow_mut().pending_requests();
        if requests.is_empty() {
            return;
        }
        self.batches = self.batches.wrapping_add(1);
        let seed = self.seed.wrapping_add(self.batches);
        let overlay = Rc::clone(&self.overlay);
        spawn_local(async move {
            let mut rasterizer = match CanvasRasterizer::new() {
                Ok(r) => r,
                Err(err) => {
                    swarm_core::warn!(error = %err, "no canvas for text sampling; overlay stays dark");
                    overlay.borrow_mut().settle_unsampled(&requests);
                    return;
                }
            };
            let settings = overlay.borrow().sampler_settings();
            let mut rng = StdRng::seed_from_u64(seed);
            for req in requests {
                let sample = sample_when_ready(
                    fonts_ready(),
                    &mut rasterizer,
                    &req.text,
                    &req.font,
                    req.budget,
                    &settings,
                    &mut rng,
                )
                .await;
                let outcome = overlay.borrow_mut().deliver(&req.ticket, &sample);
                swarm_core::debug!(section = %req.ticket.section, ?outcome, "sample delivered");
            }
        });
    }
}
