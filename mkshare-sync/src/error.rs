//! Error types for mkshare-sync.

use std::path::PathBuf;

use thiserror::Error;

use mkshare_core::ConfigError;
use mkshare_git::GitError;

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local include directory for `pull`/`push` does not exist.
    #[error(
        "no files found in '{}'; run install first or pass --include to point to the correct directory",
        path.display()
    )]
    MissingLocalDir { path: PathBuf },

    /// Enumeration found no artifacts after filtering.
    #[error("no shared makefiles in {}", path.display())]
    EmptyResourceDir { path: PathBuf },

    /// A mirror was refreshed before it was obtained.
    #[error("mirror {} does not exist; it must be cloned before it can be refreshed", path.display())]
    MirrorMissing { path: PathBuf },

    /// A version-control operation failed.
    #[error("version control error: {0}")]
    Transport(#[from] GitError),

    /// Configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Conditions reported to the user with a failure exit rather than
    /// treated as a crash.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            SyncError::MissingLocalDir { .. } | SyncError::EmptyResourceDir { .. }
        )
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
