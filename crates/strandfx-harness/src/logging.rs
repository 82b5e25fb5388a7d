//! Subscriber setup for the harness binary.
//!
//! Filter directives come from `STRANDFX_LOG` (for example
//! `STRANDFX_LOG=strandfx_core=debug`); the default is `warn`. Output goes
//! to stderr so JSON reports on stdout stay machine-readable.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "STRANDFX_LOG";

#[must_use]
pub fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_ok() {
        tracing::debug!(json, "logging initialized");
    }
}
