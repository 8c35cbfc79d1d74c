//! Per-artifact copy decisions for the pull direction.
//!
//! ## Install mode
//!
//! | local copy        | force | action         |
//! |-------------------|-------|----------------|
//! | absent            | any   | `Install`      |
//! | present           | yes   | `Install`      |
//! | present           | no    | `SkipExisting` |
//!
//! ## Pull mode
//!
//! Only artifacts already present locally are considered; anything else is
//! left out of the plan entirely.
//!
//! | local vs mirror   | force | action           |
//! |-------------------|-------|------------------|
//! | any               | yes   | `Update`         |
//! | older             | no    | `Update`         |
//! | same              | no    | `SkipUnchanged`  |
//! | newer             | no    | `SkipNewerLocal` |

use std::path::{Path, PathBuf};

use mkshare_core::{Artifact, ArtifactName};

use crate::change::{ChangeDetector, Freshness};
use crate::error::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    /// Populate a local directory; never overwrite without force.
    Install,
    /// Refresh artifacts that are already installed.
    Pull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Install,
    SkipExisting,
    Update,
    SkipUnchanged,
    SkipNewerLocal,
}

impl ActionKind {
    /// Whether applying this action copies a file.
    pub fn is_mutating(self) -> bool {
        matches!(self, ActionKind::Install | ActionKind::Update)
    }
}

/// One planned step: what to do with `name`, copying `source` → `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAction {
    pub kind: ActionKind,
    pub name: ArtifactName,
    /// Mirror copy.
    pub source: PathBuf,
    /// Local copy.
    pub target: PathBuf,
}

/// Plan actions for `mirror_artifacts` against `local_dir`, in input order.
pub fn plan(
    mode: PlanMode,
    local_dir: &Path,
    mirror_artifacts: &[Artifact],
    force: bool,
    detector: &dyn ChangeDetector,
) -> Result<Vec<SyncAction>, SyncError> {
    let mut actions = Vec::with_capacity(mirror_artifacts.len());
    for artifact in mirror_artifacts {
        let target = local_dir.join(artifact.name.as_str());
        let kind = match mode {
            PlanMode::Install => install_kind(target.exists(), force),
            PlanMode::Pull => {
                if !target.exists() {
                    tracing::debug!("ignoring {} as it is not included", target.display());
                    continue;
                }
                if force {
                    ActionKind::Update
                } else {
                    pull_kind(detector.compare(&target, &artifact.path)?)
                }
            }
        };
        tracing::debug!("plan {:?} {}", kind, artifact.name);
        actions.push(SyncAction {
            kind,
            name: artifact.name.clone(),
            source: artifact.path.clone(),
            target,
        });
    }
    Ok(actions)
}

fn install_kind(exists: bool, force: bool) -> ActionKind {
    if !exists || force {
        ActionKind::Install
    } else {
        ActionKind::SkipExisting
    }
}

fn pull_kind(freshness: Freshness) -> ActionKind {
    match freshness {
        Freshness::Older => ActionKind::Update,
        Freshness::Same => ActionKind::SkipUnchanged,
        Freshness::Newer => ActionKind::SkipNewerLocal,
    }
}
