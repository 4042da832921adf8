//! Utility functions shared by the library and the binary.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initializes the tracing subscriber for logging.
///
/// The filter is read from `RUST_LOG` and defaults to `info`. Log records go to
/// stderr so that stdout only carries command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
