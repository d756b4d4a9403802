//! Tracing subscriber setup shared by the binaries.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG` the level is `info`, or `debug` when `verbose` is set.
/// Calling this more than once is harmless.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
