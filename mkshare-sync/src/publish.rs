//! Push direction: copy local edits into the mirror and forward them upstream.
//!
//! ## State machine
//!
//! ```text
//! Idle → Classifying → Copying → Staging → Committing → Pushing → Done
//!                         │          │          │           │
//!                         └──────────┴──────────┴───────────┴─→ RollingBack → Failed
//! ```
//!
//! A failure while classifying goes straight to `Failed`: nothing has been
//! touched yet. From `Copying` on, any failure rolls the mirror back to its
//! last committed state (dropping a local commit that never reached the
//! remote) and then returns the original error. Rollback is best-effort;
//! its own failures are logged and never replace the root cause.
//!
//! Restoring content is not enough: `git checkout` stamps rewritten files
//! with the current time, and every later decision is made from mtimes. The
//! access and modification times of each mirror file about to be
//! overwritten are saved before copying and put back after the reset.

use std::path::{Path, PathBuf};

use filetime::FileTime;
use mkshare_core::{layout::RESOURCE_DIR, ArtifactName, InclusionFilter};
use mkshare_git::{CommitMode, VersionControl};

use crate::artifacts;
use crate::cache::MirrorHandle;
use crate::change::{ChangeDetector, Freshness};
use crate::error::{io_err, SyncError};
use crate::executor::copy_with_metadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Idle,
    Classifying,
    Copying,
    Staging,
    Committing,
    Pushing,
    Done,
    RollingBack,
    Failed,
}

/// A local file and where it lands in the mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishEntry {
    pub name: ArtifactName,
    pub local: PathBuf,
    pub remote: PathBuf,
}

/// Local artifacts split by how they relate to the mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishBatch {
    /// No counterpart in the mirror.
    pub added: Vec<PublishEntry>,
    /// Counterpart exists and the local copy is strictly newer.
    pub modified: Vec<PublishEntry>,
    /// Local files with nothing to publish.
    pub unchanged: Vec<PathBuf>,
}

impl PublishBatch {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    pub added: usize,
    pub modified: usize,
}

/// Classify every local artifact in `local_dir` that passes `filter`.
pub fn classify(
    local_dir: &Path,
    handle: &MirrorHandle,
    filter: &InclusionFilter,
    detector: &dyn ChangeDetector,
) -> Result<PublishBatch, SyncError> {
    let mirror_dir = handle.resource_dir();
    let mut batch = PublishBatch::default();

    for local in artifacts::scan(local_dir, filter)? {
        let remote = mirror_dir.join(local.name.as_str());
        let entry = PublishEntry {
            name: local.name.clone(),
            local: local.path.clone(),
            remote: remote.clone(),
        };
        if !remote.exists() {
            tracing::debug!("{} is new", local.path.display());
            batch.added.push(entry);
            continue;
        }
        match detector.compare(&local.path, &remote)? {
            Freshness::Newer => {
                tracing::debug!("{} is newer than {}", local.path.display(), remote.display());
                batch.modified.push(entry);
            }
            Freshness::Same | Freshness::Older => batch.unchanged.push(local.path),
        }
    }
    Ok(batch)
}

/// One publish attempt against one mirror.
pub struct PublishTransaction<'a> {
    vcs: &'a dyn VersionControl,
    handle: &'a MirrorHandle,
    branch: String,
    commit_mode: CommitMode,
    state: PublishState,
    committed: bool,
    saved_times: Vec<SavedTimes>,
    trail: Vec<PublishState>,
}

/// File times of a mirror file before it was overwritten.
#[derive(Debug, Clone)]
struct SavedTimes {
    path: PathBuf,
    accessed: FileTime,
    modified: FileTime,
}

impl SavedTimes {
    fn read(path: &Path) -> Result<Self, SyncError> {
        let meta = std::fs::metadata(path).map_err(|e| io_err(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            accessed: FileTime::from_last_access_time(&meta),
            modified: FileTime::from_last_modification_time(&meta),
        })
    }

    fn restore(&self) -> std::io::Result<()> {
        filetime::set_file_times(&self.path, self.accessed, self.modified)
    }
}

impl<'a> PublishTransaction<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        handle: &'a MirrorHandle,
        branch: impl Into<String>,
        commit_mode: CommitMode,
    ) -> Self {
        Self {
            vcs,
            handle,
            branch: branch.into(),
            commit_mode,
            state: PublishState::Idle,
            committed: false,
            saved_times: Vec::new(),
            trail: vec![PublishState::Idle],
        }
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn trail(&self) -> &[PublishState] {
        &self.trail
    }

    fn enter(&mut self, state: PublishState) {
        tracing::debug!("publish: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.trail.push(state);
    }

    /// Classify `local_dir` against the mirror. Failure here mutates nothing.
    pub fn classify(
        &mut self,
        local_dir: &Path,
        filter: &InclusionFilter,
        detector: &dyn ChangeDetector,
    ) -> Result<PublishBatch, SyncError> {
        self.enter(PublishState::Classifying);
        match classify(local_dir, self.handle, filter, detector) {
            Ok(batch) => Ok(batch),
            Err(err) => {
                self.enter(PublishState::Failed);
                Err(err)
            }
        }
    }

    /// Copy, stage, commit and push `batch`; roll back the mirror on failure.
    pub fn apply(&mut self, batch: &PublishBatch) -> Result<PublishOutcome, SyncError> {
        if batch.is_empty() {
            self.enter(PublishState::Done);
            return Ok(PublishOutcome::default());
        }
        match self.execute(batch) {
            Ok(outcome) => {
                self.enter(PublishState::Done);
                Ok(outcome)
            }
            Err(err) => {
                tracing::debug!("publish failed in {:?}: {err}", self.state);
                self.roll_back();
                Err(err)
            }
        }
    }

    fn execute(&mut self, batch: &PublishBatch) -> Result<PublishOutcome, SyncError> {
        let handle = self.handle;
        let mirror = handle.path();

        self.enter(PublishState::Copying);
        for entry in &batch.modified {
            self.saved_times.push(SavedTimes::read(&entry.remote)?);
        }
        for entry in batch.added.iter().chain(&batch.modified) {
            tracing::info!("copy {} to {}", entry.local.display(), entry.remote.display());
            copy_with_metadata(&entry.local, &entry.remote)?;
        }

        self.enter(PublishState::Staging);
        let new_files: Vec<PathBuf> = batch
            .added
            .iter()
            .map(|e| Path::new(RESOURCE_DIR).join(e.name.as_str()))
            .collect();
        if !new_files.is_empty() {
            self.vcs.stage(mirror, &new_files)?;
        }
        self.vcs.stage(mirror, &[PathBuf::from(RESOURCE_DIR)])?;

        self.enter(PublishState::Committing);
        self.vcs.commit(mirror, &self.commit_mode)?;
        self.committed = true;

        self.enter(PublishState::Pushing);
        self.vcs.push(mirror, &self.branch)?;

        Ok(PublishOutcome {
            added: batch.added.len(),
            modified: batch.modified.len(),
        })
    }

    fn roll_back(&mut self) {
        self.enter(PublishState::RollingBack);
        let handle = self.handle;
        let mirror = handle.path();
        if self.committed {
            if let Err(err) = self.vcs.discard_last_commit(mirror) {
                tracing::warn!(
                    "rollback: could not discard local commit in {}: {err}",
                    mirror.display()
                );
            }
        }
        if let Err(err) = self.vcs.reset_and_clean(mirror, Path::new(RESOURCE_DIR)) {
            tracing::warn!("rollback: could not restore {}: {err}", mirror.display());
        }
        for saved in &self.saved_times {
            if let Err(err) = saved.restore() {
                tracing::warn!(
                    "rollback: could not restore times of {}: {err}",
                    saved.path.display()
                );
            }
        }
        self.enter(PublishState::Failed);
    }
}

/// Classify and publish `local_dir` through `handle` in one transaction.
pub fn publish(
    local_dir: &Path,
    handle: &MirrorHandle,
    filter: &InclusionFilter,
    vcs: &dyn VersionControl,
    branch: &str,
    commit_mode: CommitMode,
    detector: &dyn ChangeDetector,
) -> Result<(PublishBatch, PublishOutcome), SyncError> {
    let mut tx = PublishTransaction::new(vcs, handle, branch, commit_mode);
    let batch = tx.classify(local_dir, filter, detector)?;
    let outcome = tx.apply(&batch)?;
    Ok((batch, outcome))
}
