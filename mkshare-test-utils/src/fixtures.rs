//! Filesystem fixtures with deterministic modification times.
//!
//! # Panics
//! Every helper panics on I/O failure; they are for tests only.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use filetime::FileTime;

/// `UNIX_EPOCH + secs`.
pub fn at(secs: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs.unsigned_abs())
}

/// Write `<dir>/<name>` with `content` and an mtime of `at(mtime_secs)`.
/// Creates `dir` if needed. Returns the file path.
pub fn write_artifact(dir: &Path, name: &str, content: &str, mtime_secs: i64) -> PathBuf {
    fs::create_dir_all(dir)
        .unwrap_or_else(|e| panic!("write_artifact: mkdir {}: {e}", dir.display()));
    let path = dir.join(name);
    fs::write(&path, content)
        .unwrap_or_else(|e| panic!("write_artifact: write {}: {e}", path.display()));
    set_mtime(&path, mtime_secs);
    path
}

pub fn set_mtime(path: &Path, secs: i64) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(secs, 0))
        .unwrap_or_else(|e| panic!("set_mtime: {}: {e}", path.display()));
}

pub fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|e| panic!("mtime: {}: {e}", path.display()))
}

/// Relative path → bytes for every file under `dir` (empty if `dir` is absent).
pub fn tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut out = BTreeMap::new();
    if dir.is_dir() {
        collect(dir, dir, &mut out);
    }
    out
}

fn collect(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("tree: read {}: {e}", dir.display()))
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect(root, &path, out);
        } else {
            let rel = path
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            let bytes = fs::read(&path)
                .unwrap_or_else(|e| panic!("tree: read {}: {e}", path.display()));
            out.insert(rel, bytes);
        }
    }
}

/// Recursively copy `src` into `dst`, overwriting files and keeping mtimes.
pub fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            let meta = fs::metadata(&from)?;
            fs::copy(&from, &to)?;
            filetime::set_file_mtime(&to, FileTime::from_last_modification_time(&meta))?;
        }
    }
    Ok(())
}
