//! Local mirrors of remote makefile repositories.
//!
//! One directory per remote under the cache root, named after the remote's
//! last URL segment. A mirror directory exists only once a clone has fully
//! completed: a failed clone or initial checkout removes what it created.
//! The mirror is a read-through cache; refreshing it discards local drift.
//!
//! There is no cross-process locking. Two processes refreshing or publishing
//! through the same mirror at once will race; callers serialize externally.

use std::path::{Path, PathBuf};

use mkshare_core::{layout, RemoteId};
use mkshare_git::VersionControl;

use crate::error::{io_err, SyncError};

/// A mirror that has been obtained for one remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorHandle {
    remote: RemoteId,
    path: PathBuf,
    freshly_cloned: bool,
}

impl MirrorHandle {
    pub fn remote(&self) -> &RemoteId {
        &self.remote
    }

    /// Root of the mirror's working tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<mirror>/makefiles`
    pub fn resource_dir(&self) -> PathBuf {
        layout::resource_dir(&self.path)
    }

    /// True when this run created the mirror, so it is already at the tip.
    pub fn freshly_cloned(&self) -> bool {
        self.freshly_cloned
    }
}

/// Fetch-once / refresh lifecycle for mirrors under one cache root.
pub struct RemoteCache<'a> {
    root: PathBuf,
    vcs: &'a dyn VersionControl,
}

impl<'a> RemoteCache<'a> {
    pub fn new(root: impl Into<PathBuf>, vcs: &'a dyn VersionControl) -> Self {
        Self {
            root: root.into(),
            vcs,
        }
    }

    /// `<root>/<mirror_name>`. Pure, no I/O.
    pub fn mirror_path(&self, remote: &RemoteId) -> PathBuf {
        layout::mirror_dir(&self.root, remote)
    }

    /// Clone `remote` into the cache unless a mirror already exists.
    ///
    /// An existing mirror is returned untouched.
    pub fn obtain(&self, remote: &RemoteId, branch: &str) -> Result<MirrorHandle, SyncError> {
        let path = self.mirror_path(remote);
        if path.is_dir() {
            tracing::debug!("using cached mirror {}", path.display());
            return Ok(MirrorHandle {
                remote: remote.clone(),
                path,
                freshly_cloned: false,
            });
        }

        std::fs::create_dir_all(&self.root).map_err(|e| io_err(&self.root, e))?;
        tracing::info!("cloning {} into {}", remote.url(), path.display());

        let cloned = self
            .vcs
            .clone_repo(remote.url(), &path, branch)
            .and_then(|()| self.vcs.force_checkout(&path, branch));
        if let Err(err) = cloned {
            discard_partial_clone(&path);
            return Err(err.into());
        }

        Ok(MirrorHandle {
            remote: remote.clone(),
            path,
            freshly_cloned: true,
        })
    }

    /// Fast-forward an existing mirror to the tip of `branch`.
    ///
    /// Fails with [`SyncError::MirrorMissing`] if the mirror directory is gone.
    pub fn refresh(&self, handle: &MirrorHandle, branch: &str) -> Result<(), SyncError> {
        if !handle.path.is_dir() {
            return Err(SyncError::MirrorMissing {
                path: handle.path.clone(),
            });
        }
        tracing::info!("refreshing {} from {}", handle.path.display(), branch);
        self.vcs.force_rebase_pull(&handle.path, branch)?;
        Ok(())
    }

    /// [`obtain`](Self::obtain), then [`refresh`](Self::refresh) unless the
    /// mirror was just cloned.
    pub fn obtain_fresh(&self, remote: &RemoteId, branch: &str) -> Result<MirrorHandle, SyncError> {
        let handle = self.obtain(remote, branch)?;
        if !handle.freshly_cloned {
            self.refresh(&handle, branch)?;
        }
        Ok(handle)
    }
}

fn discard_partial_clone(path: &Path) {
    if path.exists() {
        if let Err(err) = std::fs::remove_dir_all(path) {
            tracing::warn!("could not remove partial clone {}: {err}", path.display());
        }
    }
}
