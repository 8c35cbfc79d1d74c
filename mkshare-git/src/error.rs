//! Error types for mkshare-git.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// All errors a version-control operation can produce.
///
/// Any non-zero exit is a failure; the engine never retries.
#[derive(Debug, Error)]
pub enum GitError {
    /// The program could not be started (not installed, bad cwd, ...).
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("`{command}` failed in {dir} ({status})")]
    Failed {
        command: String,
        dir: PathBuf,
        status: String,
    },

    /// The process did not finish within the configured budget and was killed.
    #[error("`{command}` timed out after {}s", timeout.as_secs())]
    TimedOut { command: String, timeout: Duration },
}
