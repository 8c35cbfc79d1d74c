//! The version-control operations the sync engine depends on.

use std::path::{Path, PathBuf};

use crate::error::GitError;

/// How a publish commit obtains its message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitMode {
    /// Open the committer's editor on the terminal.
    Interactive,
    /// Commit non-interactively with this message.
    Message(String),
}

/// Opaque clone / refresh / publish operations on a local repository.
///
/// Every call blocks until the underlying operation finishes. Paths given to
/// [`stage`](Self::stage) and [`reset_and_clean`](Self::reset_and_clean) are
/// relative to `repo`.
pub trait VersionControl {
    fn clone_repo(&self, url: &str, dest: &Path, branch: &str) -> Result<(), GitError>;

    fn force_checkout(&self, repo: &Path, branch: &str) -> Result<(), GitError>;

    /// Bring `repo` to the tip of `branch` on its origin, rebasing away drift.
    fn force_rebase_pull(&self, repo: &Path, branch: &str) -> Result<(), GitError>;

    fn stage(&self, repo: &Path, paths: &[PathBuf]) -> Result<(), GitError>;

    fn commit(&self, repo: &Path, mode: &CommitMode) -> Result<(), GitError>;

    fn push(&self, repo: &Path, branch: &str) -> Result<(), GitError>;

    /// Drop the most recent local commit, keeping its changes in the work tree.
    fn discard_last_commit(&self, repo: &Path) -> Result<(), GitError>;

    /// Unstage, restore and clean `subdir` back to its last committed state.
    fn reset_and_clean(&self, repo: &Path, subdir: &Path) -> Result<(), GitError>;
}
