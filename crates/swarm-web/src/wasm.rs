#![forbid(unsafe_code)]

//! Browser bindings.

mod backdrop;
mod canvas;
mod overlay;
mod page;

pub use backdrop::{SwarmFieldWeb, SwarmNetworkWeb};
pub use canvas::CanvasRasterizer;
pub use overlay::SwarmOverlayWeb;
pub use page::{SwarmSectionWeb, SwarmStatsWeb};

use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

use crate::options::seed_from_unit;

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Seed for particle randomness: the caller's, or one drawn from
/// `Math.random`.
fn host_seed(fixed: Option<u64>) -> u64 {
    fixed.unwrap_or_else(|| seed_from_unit(js_sys::Math::random()))
}

/// The `prefers-reduced-motion` media query; `false` if unavailable.
fn prefers_reduced_motion() -> bool {
    window()
        .ok()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .is_some_and(|mq| mq.matches())
}

/// Viewport size in CSS px and the raw device pixel ratio.
fn viewport_metrics() -> Result<(f32, f32, f32), JsValue> {
    let w = window()?;
    let width = w.inner_width()?.as_f64().unwrap_or(0.0);
    let height = w.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width as f32, height as f32, w.device_pixel_ratio() as f32))
}
