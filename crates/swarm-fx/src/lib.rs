//! Scroll-driven particle effects.
//!
//! # Role in glyphswarm
//! `swarm-fx` holds every effect the page draws, independent of the browser.
//! The web frontend and the native harness both drive it through the same
//! surface: feed progress and anchors, ask for sampling work, render frames
//! into a [`swarm_render::Framebuffer`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | `SwarmConfig`: phase boundaries, budgets, fonts, env/JSON loading |
//! | [`raster`] | `TextRasterizer` trait, alpha bitmaps, built-in dot-matrix face |
//! | [`text_sampler`] | Heading → point cloud, budgeted uniform selection |
//! | [`particles`] | Per-particle scattered origin, target, and seeds |
//! | [`morph`] | Progress → phase/morph/opacity, per-particle position and alpha |
//! | [`group`] | One section's particle set with stale-sample protection |
//! | [`overlay`] | Page-level overlay across sections, reduced motion, budgets |
//! | [`scroll`] | Section progress from rects, content keyframes |
//! | [`fx`] | `ParticleFx` trait shared by the canvas effects |
//! | [`field`] | Edge-to-center particle field background |
//! | [`network`] | Rotating node network backdrop |
//! | [`stats`] | Count-up figures |

#![forbid(unsafe_code)]

pub mod config;
pub mod field;
pub mod fx;
pub mod group;
pub mod morph;
pub mod network;
pub mod overlay;
pub mod particles;
pub mod raster;
pub mod scroll;
pub mod stats;
pub mod text_sampler;

pub use config::{ConfigError, ConfigParse, PhaseBoundaries, SectionSpec, SwarmConfig};
pub use field::{FieldParams, ParticleField};
pub use fx::{FxContext, FxQuality, ParticleFx};
pub use group::{Delivery, ParticleTextGroup, SampleTicket};
pub use morph::{MorphPhase, MorphState, ParticleSprite, SpriteStyle};
pub use network::{NetworkParams, ParticleNetwork};
pub use overlay::{FrameStats, ParticleOverlay, SampleRequest, Viewport};
pub use particles::{ParticleRecord, ParticleSet};
pub use raster::{AlphaBitmap, BitmapFontRasterizer, FontSpec, RasterError, TextRasterizer};
pub use scroll::{ContentKeyframes, ContentTransform, KeyframeError, Keyframes, scroll_progress};
pub use stats::{StatCounter, about_stats};
pub use text_sampler::{SampledText, SamplerSettings, sample_text, sample_when_ready};
