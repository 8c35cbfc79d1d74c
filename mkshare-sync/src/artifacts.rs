//! Enumeration of the shared makefiles in a mirror or a local directory.

use std::path::Path;

use mkshare_core::{layout, Artifact, ArtifactName, InclusionFilter};

use crate::cache::MirrorHandle;
use crate::error::{io_err, SyncError};

/// Artifacts available from `handle`, filtered and sorted by name.
///
/// Fails with [`SyncError::EmptyResourceDir`] when nothing is left after
/// filtering, including when the mirror has no `makefiles/` directory.
pub fn list(handle: &MirrorHandle, filter: &InclusionFilter) -> Result<Vec<Artifact>, SyncError> {
    let dir = handle.resource_dir();
    let found = scan(&dir, filter)?;
    if found.is_empty() {
        return Err(SyncError::EmptyResourceDir { path: dir });
    }
    Ok(found)
}

/// Every `*.mk` file directly inside `dir` that passes `filter`, sorted by
/// name. A missing directory yields an empty list.
pub fn scan(dir: &Path, filter: &InclusionFilter) -> Result<Vec<Artifact>, SyncError> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }

    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if !layout::is_artifact_file(&path) {
            continue;
        }
        found.push(describe(&path)?);
    }
    found.sort_by(|a, b| a.name.cmp(&b.name));

    let kept = filter.apply(found, |a| a.name.as_str());
    tracing::debug!("{} artifact(s) in {}", kept.len(), dir.display());
    Ok(kept)
}

/// Build an [`Artifact`] from the file at `path`.
pub fn describe(path: &Path) -> Result<Artifact, SyncError> {
    let meta = std::fs::metadata(path).map_err(|e| io_err(path, e))?;
    let modified_at = meta.modified().map_err(|e| io_err(path, e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Artifact {
        name: ArtifactName::from(name),
        path: path.to_path_buf(),
        modified_at,
        len: meta.len(),
    })
}
