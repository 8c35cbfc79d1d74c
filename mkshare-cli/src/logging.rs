//! Subscriber for the `log` records emitted by the library crates.

use mkshare_core::Verbosity;
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins; otherwise `--debug` → debug, `--verbose` → info, else warn.
pub fn init(verbosity: Verbosity) {
    let fallback = if verbosity.debug {
        "debug"
    } else if verbosity.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
