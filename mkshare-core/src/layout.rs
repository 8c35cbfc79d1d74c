//! Fixed names and path helpers for mirrors and consuming projects.
//!
//! # Mirror layout
//!
//! ```text
//! <cache_root>/
//!   <mirror_name>/        (one clone per remote, named after its last URL segment)
//!     makefiles/
//!       Common.mk
//!       Rust.mk
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::RemoteId;

pub const RESOURCE_DIR: &str = "makefiles";
pub const ARTIFACT_EXTENSION: &str = "mk";

pub const DEFAULT_INCLUDE_DIR: &str = "include";
pub const DEFAULT_ROOT_MAKEFILE: &str = "Makefile";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const CACHE_DIR_NAME: &str = "mkshare";
pub const PROJECT_CONFIG_FILE: &str = ".mkshare.yaml";

/// Last line of every generated root makefile.
pub const TRAILING_DIRECTIVE: &str = "SRC ?= src";

/// `<home>/.cache/mkshare`
pub fn default_cache_root_at(home: &Path) -> PathBuf {
    home.join(".cache").join(CACHE_DIR_NAME)
}

/// `default_cache_root_at` convenience wrapper.
pub fn default_cache_root() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(default_cache_root_at(&home))
}

/// `<cache_root>/<mirror_name>`. Pure, no I/O.
pub fn mirror_dir(cache_root: &Path, remote: &RemoteId) -> PathBuf {
    cache_root.join(remote.mirror_name())
}

/// `<mirror>/makefiles`
pub fn resource_dir(mirror: &Path) -> PathBuf {
    mirror.join(RESOURCE_DIR)
}

/// True for regular files ending in `.mk` (exact, case-sensitive extension).
pub fn is_artifact_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext == ARTIFACT_EXTENSION)
            .unwrap_or(false)
}
