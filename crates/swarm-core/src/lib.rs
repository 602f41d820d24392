#![forbid(unsafe_code)]

//! Core: easing curves, scroll-progress staggering, and logging macros shared
//! by every glyphswarm effect.

pub mod animation;
pub mod logging;

#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
