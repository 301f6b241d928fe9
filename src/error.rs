//! Error type shared by the host-side plumbing.
//!
//! The reveal and scroll controllers never fail: contract violations are
//! clamped and logged. Errors only come from the places that touch the OS
//! (spawning actor threads, configuring the terminal, installing the
//! global subscriber).

use thiserror::Error;

/// Errors raised by driftview's host plumbing.
#[derive(Debug, Error)]
pub enum Error {
    /// An actor thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name that failed to start.
        name: &'static str,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Terminal setup or teardown failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// The global tracing subscriber could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
