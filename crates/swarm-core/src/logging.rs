#![forbid(unsafe_code)]

//! `debug!`/`info!`/`trace!`/`warn!` for effect code.
//!
//! The `tracing` feature forwards to `tracing`. Without it each macro is a
//! statement that drops its tokens unexpanded, so field expressions in frame
//! loops cost nothing.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod silent {
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}
