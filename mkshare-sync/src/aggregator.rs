//! The project's root makefile that includes every shared makefile.
//!
//! The file is rewritten from scratch on each install, never appended to:
//!
//! ```text
//! include include/Common.mk
//! include include/Rust.mk
//!
//! SRC ?= src
//! ```

use std::path::{Path, PathBuf};

use mkshare_core::layout::TRAILING_DIRECTIVE;

use crate::error::{io_err, SyncError};

/// Render the root makefile for `includes`, sorted.
pub fn render(includes: &[PathBuf]) -> String {
    let mut sorted: Vec<&PathBuf> = includes.iter().collect();
    sorted.sort();
    sorted.dedup();

    let mut out = String::new();
    for path in sorted {
        out.push_str("include ");
        out.push_str(&path.to_string_lossy());
        out.push('\n');
    }
    out.push('\n');
    out.push_str(TRAILING_DIRECTIVE);
    out.push('\n');
    out
}

/// Atomically replace `path` with the rendered root makefile.
pub fn write(path: &Path, includes: &[PathBuf]) -> Result<(), SyncError> {
    let content = render(includes);
    let tmp = PathBuf::from(format!("{}.mkshare.tmp", path.display()));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    tracing::info!("wrote: {}", path.display());
    Ok(())
}
