#![forbid(unsafe_code)]

use swarm_fx::SwarmConfig;
use swarm_fx::field::{FieldParams, ParticleField};
use swarm_fx::fx::{FxContext, FxQuality, ParticleFx};
use swarm_fx::network::{NetworkParams, ParticleNetwork};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::canvas::CanvasTarget;
use super::{host_seed, prefers_reduced_motion, viewport_metrics};

/// A `ParticleFx` bound to its own canvas.
struct Backdrop<F> {
    fx: F,
    target: CanvasTarget,
    width: f32,
    height: f32,
    pixel_ratio: f32,
    quality: FxQuality,
    start_ms: Option<f64>,
}

impl<F: ParticleFx> Backdrop<F> {
    fn new(fx: F, canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        Ok(Self {
            fx,
            target: CanvasTarget::new(canvas)?,
            width: 0.0,
            height: 0.0,
            pixel_ratio: 1.0,
            quality: FxQuality::Full,
            start_ms: None,
        })
    }

    fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        let config = SwarmConfig::default();
        let (viewport_width, _, dpr) = viewport_metrics()?;
        self.width = width;
        self.height = height;
        self.pixel_ratio = config.pixel_ratio(dpr);
        self.quality = FxQuality::for_viewport(
            prefers_reduced_motion(),
            viewport_width,
            config.mobile_breakpoint,
        );
        self.target.resize(width, height, self.pixel_ratio);
        self.fx.resize(width, height);
        swarm_core::debug!(fx = self.fx.name(), width, height, quality = ?self.quality, "backdrop resized");
        Ok(())
    }

    fn frame(&mut self, progress: f32, time_ms: f64) -> Result<(), JsValue> {
        if !self.quality.is_enabled() {
            self.target.clear();
            return Ok(());
        }
        let start = *self.start_ms.get_or_insert(time_ms);
        let ctx = FxContext {
            width: self.width,
            height: self.height,
            pixel_ratio: self.pixel_ratio,
            time_seconds: ((time_ms - start) / 1000.0) as f32,
            progress,
            quality: self.quality,
        };
        self.fx.render(&ctx, self.target.framebuffer());
        self.target.present()
    }
}

/// Edge-to-center particle field for one section's background canvas.
#[wasm_bindgen]
pub struct SwarmFieldWeb {
    inner: Backdrop<ParticleField>,
}

#[wasm_bindgen]
impl SwarmFieldWeb {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, seed: Option<f64>) -> Result<SwarmFieldWeb, JsValue> {
        let field = ParticleField::new(FieldParams::default(), host_seed(seed.map(|s| s as u64)));
        Ok(Self {
            inner: Backdrop::new(field, canvas)?,
        })
    }

    /// Section size in CSS px.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.inner.resize(width, height)
    }

    /// Draw at section scroll progress `progress`.
    pub fn frame(&mut self, progress: f32) -> Result<(), JsValue> {
        self.inner.frame(progress, 0.0)
    }
}

/// Rotating node network for the hero backdrop.
#[wasm_bindgen]
pub struct SwarmNetworkWeb {
    inner: Backdrop<ParticleNetwork>,
}

#[wasm_bindgen]
impl SwarmNetworkWeb {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, seed: Option<f64>) -> Result<SwarmNetworkWeb, JsValue> {
        let network = ParticleNetwork::new(NetworkParams::default(), host_seed(seed.map(|s| s as u64)));
        Ok(Self {
            inner: Backdrop::new(network, canvas)?,
        })
    }

    /// Canvas size in CSS px.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.inner.resize(width, height)
    }

    /// Draw one frame. `time_ms` is the `requestAnimationFrame` timestamp.
    pub fn frame(&mut self, time_ms: f64) -> Result<(), JsValue> {
        self.inner.frame(0.0, time_ms)
    }
}
