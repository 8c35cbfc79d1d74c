//! Domain types shared by every mkshare crate.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::ConfigError;
use crate::filter;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// File name of a shared artifact, e.g. `Common.mk`. Unique within a mirror.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactName(pub String);

impl ArtifactName {
    /// Case- and extension-insensitive form used for filtering.
    pub fn normalized(&self) -> String {
        filter::normalize(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ArtifactName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ArtifactName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identity of one remote artifact source.
///
/// Holds both what the user typed and the URL handed to version control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteId {
    raw: String,
    url: String,
}

impl RemoteId {
    /// Resolve a user-supplied identifier into a fetchable URL.
    ///
    /// Values starting with `git`, containing `://`, or naming an existing
    /// local path are kept verbatim. Anything else is a GitHub `owner/repo`
    /// slug and expands to `git@github.com:owner/repo`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::MissingRemote);
        }
        let url = if raw.starts_with("git") || raw.contains("://") || Path::new(raw).exists() {
            raw.to_owned()
        } else {
            format!("git@github.com:{raw}")
        };
        let id = Self {
            raw: raw.to_owned(),
            url,
        };
        if matches!(id.mirror_name(), "" | "." | "..") {
            return Err(ConfigError::InvalidRemote { raw: id.raw });
        }
        Ok(id)
    }

    /// The identifier as given on the command line or in config.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// URL passed to `clone`.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Final path segment of the URL; names the mirror directory.
    pub fn mirror_name(&self) -> &str {
        self.url
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\', ':'])
            .next()
            .unwrap_or_default()
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.url.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One shared build-rule file found in a mirror or a local directory.
///
/// Content is never read by the engine; files are only copied wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: ArtifactName,
    pub path: PathBuf,
    pub modified_at: SystemTime,
    pub len: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
