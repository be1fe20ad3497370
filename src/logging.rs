//! Tracing subscriber setup
//!
//! Logs go to stderr so they never mix with command output on stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging; `RUST_LOG` overrides `level` when set
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
