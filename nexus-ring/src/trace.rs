//! Tracing hooks for debugging nexus-ring.
//!
//! Enable with `--features tracing`. The macros compile to nothing when the
//! feature is disabled, and are only ever used on cold paths (construction,
//! splitting, teardown). `push` and `pop` never log.

/// Installs a `tracing` subscriber with thread ids and uptime timestamps.
///
/// Filtering follows `RUST_LOG`, defaulting to `nexus_ring=trace`. Calling it
/// more than once is harmless; only the first subscriber is installed.
/// Does nothing if the `tracing` feature is not enabled.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nexus_ring=trace"));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

/// Installs a `tracing` subscriber. No-op without the `tracing` feature.
#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace};

#[cfg(not(feature = "tracing"))]
macro_rules! trace_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug_noop as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use trace_noop as trace;

#[cfg(test)]
mod tests {
    use super::init_tracing;

    #[test]
    fn init_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
