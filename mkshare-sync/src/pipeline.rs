//! Command pipelines shared by every front end.
//!
//! Each command runs strictly in order: obtain/refresh the mirror, enumerate,
//! plan or classify, copy, and (for push) commit and push. Later steps read
//! the filesystem state the earlier ones left behind.

use std::path::PathBuf;

use mkshare_core::{Artifact, Reporter, Settings};
use mkshare_git::{CommitMode, VersionControl};

use crate::aggregator;
use crate::artifacts;
use crate::cache::RemoteCache;
use crate::change::MtimeDetector;
use crate::error::{io_err, SyncError};
use crate::executor::{self, ApplySummary};
use crate::planner::{self, ActionKind, PlanMode, SyncAction};
use crate::publish::{self, PublishOutcome};

/// Outcome of `install`.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub summary: ApplySummary,
    /// Include-directory paths listed in the root makefile.
    pub includes: Vec<PathBuf>,
    pub root_makefile: PathBuf,
}

/// Outcome of `pull`.
#[derive(Debug, Clone)]
pub struct PullReport {
    pub summary: ApplySummary,
}

/// Everything one command invocation needs.
pub struct Session<'a> {
    pub settings: &'a Settings,
    pub vcs: &'a dyn VersionControl,
    pub reporter: &'a dyn Reporter,
}

impl<'a> Session<'a> {
    pub fn new(
        settings: &'a Settings,
        vcs: &'a dyn VersionControl,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            settings,
            vcs,
            reporter,
        }
    }

    fn cache(&self) -> RemoteCache<'a> {
        RemoteCache::new(self.settings.cache_root.clone(), self.vcs)
    }

    fn require_local_dir(&self) -> Result<(), SyncError> {
        if self.settings.include_dir.is_dir() {
            Ok(())
        } else {
            Err(SyncError::MissingLocalDir {
                path: self.settings.include_dir.clone(),
            })
        }
    }

    /// Copy shared makefiles into the include directory and regenerate the
    /// root makefile.
    pub fn install(&self) -> Result<InstallReport, SyncError> {
        let s = self.settings;
        self.reporter
            .info(&format!("Installing makefiles from {}..", s.remote.url()));

        let handle = self.cache().obtain_fresh(&s.remote, &s.branch)?;
        let available = artifacts::list(&handle, &s.filter)?;

        std::fs::create_dir_all(&s.include_dir).map_err(|e| io_err(&s.include_dir, e))?;
        let actions = planner::plan(
            PlanMode::Install,
            &s.include_dir,
            &available,
            s.force,
            &MtimeDetector,
        )?;
        for action in &actions {
            if action.kind == ActionKind::SkipExisting {
                self.reporter.notice(&format!(
                    "{} already present, refusing to override",
                    action.target.display()
                ));
            }
        }
        let summary = executor::apply(&actions)?;

        let includes: Vec<PathBuf> = actions
            .iter()
            .filter(|a| a.target.exists())
            .map(|a| a.target.clone())
            .collect();
        aggregator::write(&s.root_makefile, &includes)?;

        if summary.installed > 0 {
            self.reporter.info(&format!(
                "Added {} to project root and {} shared makefile(s).",
                s.root_makefile.display(),
                summary.installed
            ));
            self.reporter.info(&format!(
                "Feel free to add custom rules to {}, and check out the included files under {}.",
                s.root_makefile.display(),
                s.include_dir.display()
            ));
        }

        Ok(InstallReport {
            summary,
            includes,
            root_makefile: s.root_makefile.clone(),
        })
    }

    /// Update already-installed makefiles from the refreshed mirror.
    pub fn pull(&self) -> Result<PullReport, SyncError> {
        let s = self.settings;
        self.require_local_dir()?;

        self.reporter
            .debug(&format!("Using cache {}", s.cache_root.display()));
        self.reporter
            .info(&format!("Refreshing cached copy of {}...", s.remote.url()));
        let cache = self.cache();
        let handle = cache.obtain(&s.remote, &s.branch)?;
        cache.refresh(&handle, &s.branch)?;

        let available = artifacts::list(&handle, &s.filter)?;
        let actions = planner::plan(
            PlanMode::Pull,
            &s.include_dir,
            &available,
            s.force,
            &MtimeDetector,
        )?;
        self.report_pull(&actions);
        let summary = executor::apply(&actions)?;

        self.reporter
            .info(&format!("{} file(s) updated", summary.updated));
        Ok(PullReport { summary })
    }

    fn report_pull(&self, actions: &[SyncAction]) {
        for action in actions {
            let target = action.target.display();
            match action.kind {
                ActionKind::Update => self.reporter.info(&format!("updating {target}")),
                ActionKind::SkipUnchanged => self
                    .reporter
                    .notice(&format!("skipping unchanged {target}")),
                ActionKind::SkipNewerLocal => self
                    .reporter
                    .notice(&format!("{target} is more recent, skipping")),
                ActionKind::Install | ActionKind::SkipExisting => {}
            }
        }
    }

    /// Shared makefiles available from the mirror, after filtering.
    pub fn list(&self) -> Result<Vec<Artifact>, SyncError> {
        let s = self.settings;
        self.reporter
            .info(&format!("Listing available makefiles in {}...", s.remote.raw()));
        let handle = self.cache().obtain(&s.remote, &s.branch)?;
        artifacts::list(&handle, &s.filter)
    }

    /// Publish local edits and new makefiles upstream.
    pub fn push(&self, commit_mode: CommitMode) -> Result<PublishOutcome, SyncError> {
        let s = self.settings;
        self.require_local_dir()?;

        self.reporter
            .debug(&format!("Using cache {}", s.cache_root.display()));
        self.reporter
            .info(&format!("Refreshing cached copy of {}...", s.remote.url()));
        let handle = self.cache().obtain_fresh(&s.remote, &s.branch)?;

        let (batch, outcome) = publish::publish(
            &s.include_dir,
            &handle,
            &s.filter,
            self.vcs,
            &s.branch,
            commit_mode,
            &MtimeDetector,
        )?;

        for entry in batch.added.iter().chain(&batch.modified) {
            self.reporter.info(&format!(
                "copied {} to {}",
                entry.local.display(),
                entry.remote.display()
            ));
        }
        for path in &batch.unchanged {
            self.reporter
                .notice(&format!("no changes to {}, skipping", path.display()));
        }
        if !batch.added.is_empty() {
            self.reporter.notice(&format!(
                "Added {} new file(s) to shared repository {}",
                batch.added.len(),
                s.remote.raw()
            ));
        }
        if batch.is_empty() {
            self.reporter.info("Nothing to publish");
        } else {
            self.reporter.info(&format!(
                "Published {} new and {} modified file(s)",
                outcome.added, outcome.modified
            ));
        }
        Ok(outcome)
    }
}
