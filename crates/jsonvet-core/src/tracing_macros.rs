//! Engine logging.
//!
//! Events are emitted under the `jsonvet` target and compile away when the
//! `tracing` feature is disabled. Crate-internal; loaded with `#[macro_use]`.

/// Debug event under the `jsonvet` target
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "jsonvet", $($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

/// Trace event under the `jsonvet` target, for per-node descent
#[cfg(feature = "tracing")]
macro_rules! trace_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "jsonvet", $($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_trace {
    ($($arg:tt)*) => {};
}
