//! Shared setup for the pipeline scenario tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mkshare_core::{Overrides, ProjectConfig, Settings};
use tempfile::TempDir;

/// A scratch project: an upstream directory standing in for the remote, a
/// cache root, and a consuming project with `include/` and `Makefile`.
pub struct Project {
    pub tmp: TempDir,
    pub upstream: PathBuf,
    pub cache: PathBuf,
    pub include: PathBuf,
    pub makefile: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let tmp = TempDir::new().expect("tempdir");
        let upstream = tmp.path().join("shared-rules");
        std::fs::create_dir_all(upstream.join("makefiles")).expect("upstream");
        let project = tmp.path().join("project");
        std::fs::create_dir_all(&project).expect("project");
        Self {
            cache: tmp.path().join("cache"),
            include: project.join("include"),
            makefile: project.join("Makefile"),
            upstream,
            tmp,
        }
    }

    pub fn upstream_files(&self) -> PathBuf {
        self.upstream.join("makefiles")
    }

    pub fn mirror(&self) -> PathBuf {
        self.cache.join("shared-rules")
    }

    pub fn mirror_files(&self) -> PathBuf {
        self.mirror().join("makefiles")
    }

    pub fn settings(&self) -> Settings {
        self.settings_with(|_| {})
    }

    pub fn settings_with(&self, tweak: impl FnOnce(&mut Overrides)) -> Settings {
        let mut overrides = Overrides {
            repo: Some(path_str(&self.upstream)),
            include: Some(self.include.clone()),
            makefile: Some(self.makefile.clone()),
            cache_dir: Some(self.cache.clone()),
            ..Overrides::default()
        };
        tweak(&mut overrides);
        Settings::resolve_at(overrides, ProjectConfig::default(), None).expect("settings")
    }
}

pub fn path_str(path: &Path) -> String {
    path.to_str().expect("utf-8 path").to_owned()
}
