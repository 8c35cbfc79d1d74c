//! Applies planned actions and copies files with their metadata.
//!
//! Copies keep the source's modification time and permission bits, so a
//! pull planned right after a successful copy sees equal mtimes and does
//! nothing.

use std::path::Path;

use filetime::FileTime;

use crate::error::{io_err, SyncError};
use crate::planner::{ActionKind, SyncAction};

/// Counts per action kind for one applied plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub installed: usize,
    pub updated: usize,
    pub skipped_existing: usize,
    pub skipped_unchanged: usize,
    pub skipped_newer: usize,
}

impl ApplySummary {
    /// Number of files actually copied.
    pub fn copied(&self) -> usize {
        self.installed + self.updated
    }

    fn record(&mut self, kind: ActionKind) {
        match kind {
            ActionKind::Install => self.installed += 1,
            ActionKind::Update => self.updated += 1,
            ActionKind::SkipExisting => self.skipped_existing += 1,
            ActionKind::SkipUnchanged => self.skipped_unchanged += 1,
            ActionKind::SkipNewerLocal => self.skipped_newer += 1,
        }
    }
}

/// Apply `actions` in order. Stops at the first failed copy.
pub fn apply(actions: &[SyncAction]) -> Result<ApplySummary, SyncError> {
    let mut summary = ApplySummary::default();
    for action in actions {
        if action.kind.is_mutating() {
            copy_with_metadata(&action.source, &action.target)?;
            tracing::info!("{:?}: {}", action.kind, action.target.display());
        }
        summary.record(action.kind);
    }
    Ok(summary)
}

/// Copy bytes, permission bits and access/modification times from `src`
/// to `dst`, creating `dst`'s parent directory if needed.
pub fn copy_with_metadata(src: &Path, dst: &Path) -> Result<(), SyncError> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let meta = std::fs::metadata(src).map_err(|e| io_err(src, e))?;
    std::fs::copy(src, dst).map_err(|e| io_err(dst, e))?;
    std::fs::set_permissions(dst, meta.permissions()).map_err(|e| io_err(dst, e))?;
    filetime::set_file_times(
        dst,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
    .map_err(|e| io_err(dst, e))?;
    Ok(())
}
