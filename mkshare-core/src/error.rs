//! Error types for mkshare-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `.mkshare.yaml` exists but is not valid YAML for [`crate::ProjectConfig`].
    #[error("failed to parse project config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Neither `--repo` nor the project config named a remote.
    #[error("no remote repository given; pass --repo or set `repo` in .mkshare.yaml")]
    MissingRemote,

    /// The remote identifier has no usable final path segment.
    #[error("invalid remote repository '{raw}'")]
    InvalidRemote { raw: String },

    /// The subprocess timeout must be at least one second.
    #[error("timeout must be greater than zero seconds")]
    InvalidTimeout,

    /// `dirs::home_dir()` returned `None` and no cache directory was given.
    #[error("cannot determine home directory; set $HOME or pass --cache-dir")]
    HomeNotFound,
}
