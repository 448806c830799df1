//! provides logging helpers

use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{registry, EnvFilter};

/// Level used when `RUST_LOG` is unset and `--verbose` is given.
pub const VERBOSE_DIRECTIVE: &str = "debug";
/// Level used when `RUST_LOG` is unset and `--verbose` is not given.
pub const QUIET_DIRECTIVE: &str = "error";

/// initiate the global tracing subscriber, writing to stderr
///
/// # Errors
/// Fails when a global subscriber is already installed.
pub fn init(verbose: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_DIRECTIVE
        } else {
            QUIET_DIRECTIVE
        })
    });

    registry()
        .with(layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init()
}
