//! Logging shims.
//!
//! With the `tracing` feature these are the `tracing` macros. Without it they
//! swallow their arguments, so call sites never need a `cfg`.
//!
//! Levels used across the crate: zoom passes at `info`, tiles and grid work
//! at `debug`, failed tiles and late bounds changes at `warn`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __cartograph_log_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::__cartograph_log_noop as debug;
#[cfg(not(feature = "tracing"))]
pub use crate::__cartograph_log_noop as info;
#[cfg(not(feature = "tracing"))]
pub use crate::__cartograph_log_noop as warn;
