//! Project config file and fully-resolved runtime settings.
//!
//! # Precedence
//!
//! Command-line [`Overrides`] win over `.mkshare.yaml` ([`ProjectConfig`]),
//! which wins over the built-in defaults in [`crate::layout`].
//!
//! # API pattern
//!
//! Loading takes an explicit directory (`load_at`) so tests can point it at
//! a `TempDir`; nothing here reads the process working directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::filter::InclusionFilter;
use crate::layout;
use crate::types::RemoteId;

// ---------------------------------------------------------------------------
// Project config file
// ---------------------------------------------------------------------------

/// Optional per-project defaults stored in `.mkshare.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub repo: Option<String>,
    pub include: Option<PathBuf>,
    pub makefile: Option<PathBuf>,
    pub branch: Option<String>,
    pub only: Vec<String>,
}

impl ProjectConfig {
    /// `<dir>/.mkshare.yaml`. Pure, no I/O.
    pub fn path_at(dir: &Path) -> PathBuf {
        dir.join(layout::PROJECT_CONFIG_FILE)
    }

    /// Load `<dir>/.mkshare.yaml`, or the empty config when the file is absent.
    ///
    /// Returns `ConfigError::Parse` (with path) if the file is malformed.
    pub fn load_at(dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_at(dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Output flags honoured by the reporter and the VCS subprocess runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbosity {
    pub quiet: bool,
    pub verbose: bool,
    pub debug: bool,
}

/// Values supplied on the command line (or their environment fallbacks).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub repo: Option<String>,
    pub include: Option<PathBuf>,
    pub makefile: Option<PathBuf>,
    pub branch: Option<String>,
    /// Comma-separated inclusion list.
    pub only: Option<String>,
    pub force: bool,
    pub cache_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub verbosity: Verbosity,
}

/// Everything a command needs, resolved once per invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub remote: RemoteId,
    pub include_dir: PathBuf,
    pub root_makefile: PathBuf,
    pub branch: String,
    pub force: bool,
    pub filter: InclusionFilter,
    pub cache_root: PathBuf,
    pub timeout: Duration,
    pub verbosity: Verbosity,
}

impl Settings {
    /// Merge overrides over the project file. `home` locates the default
    /// cache root when no `--cache-dir` was given.
    pub fn resolve_at(
        overrides: Overrides,
        file: ProjectConfig,
        home: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let raw_remote = overrides
            .repo
            .or(file.repo)
            .ok_or(ConfigError::MissingRemote)?;
        let remote = RemoteId::parse(&raw_remote)?;

        let filter = match overrides.only {
            Some(list) => InclusionFilter::parse_list(&list),
            None => InclusionFilter::new(&file.only),
        };

        let cache_root = match overrides.cache_dir {
            Some(dir) => dir,
            None => layout::default_cache_root_at(home.ok_or(ConfigError::HomeNotFound)?),
        };

        let timeout = match overrides.timeout_secs {
            Some(0) => return Err(ConfigError::InvalidTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => layout::DEFAULT_TIMEOUT,
        };

        Ok(Self {
            remote,
            include_dir: overrides
                .include
                .or(file.include)
                .unwrap_or_else(|| PathBuf::from(layout::DEFAULT_INCLUDE_DIR)),
            root_makefile: overrides
                .makefile
                .or(file.makefile)
                .unwrap_or_else(|| PathBuf::from(layout::DEFAULT_ROOT_MAKEFILE)),
            branch: overrides
                .branch
                .or(file.branch)
                .unwrap_or_else(|| layout::DEFAULT_BRANCH.to_owned()),
            force: overrides.force,
            filter,
            cache_root,
            timeout,
            verbosity: overrides.verbosity,
        })
    }

    /// `resolve_at` convenience wrapper using `dirs::home_dir()`.
    pub fn resolve(overrides: Overrides, file: ProjectConfig) -> Result<Self, ConfigError> {
        let home = dirs::home_dir();
        Self::resolve_at(overrides, file, home.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_repo(repo: &str) -> Overrides {
        Overrides {
            repo: Some(repo.to_owned()),
            ..Overrides::default()
        }
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::resolve_at(
            with_repo("acme/makefiles"),
            ProjectConfig::default(),
            Some(Path::new("/home/dev")),
        )
        .unwrap();

        assert_eq!(settings.include_dir, PathBuf::from("include"));
        assert_eq!(settings.root_makefile, PathBuf::from("Makefile"));
        assert_eq!(settings.branch, "master");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.filter.is_empty());
        assert_eq!(
            layout::mirror_dir(&settings.cache_root, &settings.remote),
            PathBuf::from("/home/dev/.cache/mkshare/makefiles")
        );
    }

    #[test]
    fn command_line_wins_over_project_file() {
        let file = ProjectConfig {
            repo: Some("acme/from-file".into()),
            branch: Some("develop".into()),
            only: vec!["python".into()],
            ..ProjectConfig::default()
        };
        let overrides = Overrides {
            repo: Some("acme/from-cli".into()),
            only: Some("rust".into()),
            cache_dir: Some(PathBuf::from("/tmp/cache")),
            ..Overrides::default()
        };

        let settings = Settings::resolve_at(overrides, file, None).unwrap();
        assert_eq!(settings.remote.raw(), "acme/from-cli");
        assert_eq!(settings.branch, "develop");
        assert!(settings.filter.includes("Rust.mk"));
        assert!(!settings.filter.includes("Python.mk"));
        assert_eq!(
            layout::mirror_dir(&settings.cache_root, &settings.remote),
            PathBuf::from("/tmp/cache/from-cli")
        );
    }

    #[test]
    fn missing_remote_is_a_config_error() {
        let err = Settings::resolve_at(Overrides::default(), ProjectConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRemote));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let overrides = Overrides {
            timeout_secs: Some(0),
            cache_dir: Some(PathBuf::from("/tmp")),
            ..with_repo("acme/makefiles")
        };
        let err = Settings::resolve_at(overrides, ProjectConfig::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout));
    }

    #[test]
    fn no_home_and_no_cache_dir_fails() {
        let err = Settings::resolve_at(with_repo("acme/x"), ProjectConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::HomeNotFound));
    }
}
