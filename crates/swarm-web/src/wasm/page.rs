#![forbid(unsafe_code)]

use wasm_bindgen::prelude::*;
use web_sys::Element;

use super::{prefers_reduced_motion, viewport_metrics};
use crate::page::{SectionReveal, StatsBoard};

/// Scroll reveal for one section element.
#[wasm_bindgen]
pub struct SwarmSectionWeb {
    element: Element,
    reveal: SectionReveal,
    reduced_motion: bool,
}

#[wasm_bindgen]
impl SwarmSectionWeb {
    #[wasm_bindgen(constructor)]
    pub fn new(element: Element) -> Self {
        Self {
            element,
            reveal: SectionReveal::default(),
            reduced_motion: prefers_reduced_motion(),
        }
    }

    #[wasm_bindgen(js_name = setReducedMotion)]
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// `[opacity, offsetY, blur]` for the element's current position.
    pub fn frame(&self) -> Result<Vec<f32>, JsValue> {
        let (_, viewport_height, _) = viewport_metrics()?;
        let r = self.element.get_bounding_client_rect();
        Ok(self
            .reveal
            .transform(r.top() as f32, r.height() as f32, viewport_height, self.reduced_motion)
            .to_vec())
    }
}

/// Count-up figures for the about section. The host reports visibility
/// from its intersection observer and calls `frame` while animating.
#[wasm_bindgen]
#[derive(Default)]
pub struct SwarmStatsWeb {
    board: StatsBoard,
}

#[wasm_bindgen]
impl SwarmStatsWeb {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.board.labels()
    }

    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&mut self, visible: bool) {
        self.board.set_visible(visible);
    }

    /// Display strings at the `requestAnimationFrame` timestamp.
    pub fn frame(&mut self, time_ms: f64) -> Vec<String> {
        self.board.frame(time_ms)
    }

    #[wasm_bindgen(getter)]
    pub fn complete(&self) -> bool {
        self.board.is_complete()
    }
}
