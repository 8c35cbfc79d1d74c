//! Change detection between a local file and its mirror counterpart.
//!
//! Only modification times are compared. Clock skew and touch-without-edit
//! are known blind spots; content is never read. Planning and publishing
//! go through [`ChangeDetector`] so another strategy can replace
//! [`MtimeDetector`] without touching either.

use std::cmp::Ordering;
use std::path::Path;
use std::time::SystemTime;

use crate::error::{io_err, SyncError};

/// How the local copy relates to the mirror copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The mirror has a newer version.
    Older,
    /// Neither side changed relative to the other.
    Same,
    /// The local copy carries edits the mirror does not have.
    Newer,
}

pub trait ChangeDetector {
    fn compare(&self, local: &Path, mirror: &Path) -> Result<Freshness, SyncError>;
}

/// Compares filesystem modification times.
#[derive(Debug, Clone, Copy, Default)]
pub struct MtimeDetector;

impl ChangeDetector for MtimeDetector {
    fn compare(&self, local: &Path, mirror: &Path) -> Result<Freshness, SyncError> {
        Ok(compare_times(mtime(local)?, mtime(mirror)?))
    }
}

/// Three-way comparison of `local` against `mirror`.
pub fn compare_times(local: SystemTime, mirror: SystemTime) -> Freshness {
    match local.cmp(&mirror) {
        Ordering::Less => Freshness::Older,
        Ordering::Equal => Freshness::Same,
        Ordering::Greater => Freshness::Newer,
    }
}

fn mtime(path: &Path) -> Result<SystemTime, SyncError> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| io_err(path, e))
}
