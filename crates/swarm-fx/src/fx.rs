#![forbid(unsafe_code)]

//! Common surface for the canvas effects.
//!
//! Every effect draws into a device-pixel [`Framebuffer`] from an
//! [`FxContext`]. The host owns the loop: it resizes on layout changes and
//! renders once per animation frame. Effects never block.

use swarm_render::Framebuffer;

/// How much work an effect may do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FxQuality {
    /// Render nothing (reduced motion).
    Off,
    /// Fewer elements for narrow viewports.
    Reduced,
    /// Normal detail.
    #[default]
    Full,
}

impl FxQuality {
    /// Pick quality from the reduced-motion switch and viewport width.
    #[must_use]
    pub fn for_viewport(reduced_motion: bool, width: f32, mobile_breakpoint: f32) -> Self {
        if reduced_motion {
            Self::Off
        } else if width < mobile_breakpoint {
            Self::Reduced
        } else {
            Self::Full
        }
    }

    #[inline]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Per-frame inputs shared by all effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxContext {
    /// Layout width in CSS px.
    pub width: f32,
    /// Layout height in CSS px.
    pub height: f32,
    /// Capped device pixel ratio; framebuffer px = CSS px × ratio.
    pub pixel_ratio: f32,
    /// Seconds since the effect started.
    pub time_seconds: f32,
    /// Scroll progress of the section hosting the effect. Time-driven
    /// effects ignore it.
    pub progress: f32,
    pub quality: FxQuality,
}

impl FxContext {
    /// Framebuffer size for this layout.
    #[must_use]
    pub fn device_size(&self) -> (u32, u32) {
        let scale = |v: f32| {
            let px = (v * self.pixel_ratio).floor();
            if px.is_finite() && px > 0.0 { px as u32 } else { 0 }
        };
        (scale(self.width), scale(self.height))
    }
}

/// A canvas effect.
pub trait ParticleFx {
    /// Human-readable name (used in logs and the harness).
    fn name(&self) -> &'static str;

    /// Layout changed; regenerate anything sized to it.
    fn resize(&mut self, _width: f32, _height: f32) {}

    /// Draw one frame. The framebuffer is cleared by the caller.
    fn render(&mut self, ctx: &FxContext, fb: &mut Framebuffer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_from_viewport() {
        assert_eq!(FxQuality::for_viewport(true, 1200.0, 768.0), FxQuality::Off);
        assert_eq!(FxQuality::for_viewport(false, 500.0, 768.0), FxQuality::Reduced);
        assert_eq!(FxQuality::for_viewport(false, 768.0, 768.0), FxQuality::Full);
        assert!(!FxQuality::Off.is_enabled());
    }

    #[test]
    fn device_size_scales_and_floors() {
        let ctx = FxContext {
            width: 101.0,
            height: 50.0,
            pixel_ratio: 1.5,
            time_seconds: 0.0,
            progress: 0.0,
            quality: FxQuality::Full,
        };
        assert_eq!(ctx.device_size(), (151, 75));
    }
}
