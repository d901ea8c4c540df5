//! Filesystem utilities.
//!
//! Helper functions for walking source trees.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ModkitError, Result};

/// A regular file found under a walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Path relative to the walk root, always `/`-separated.
    pub relative: String,
    /// Path on disk.
    pub path: PathBuf,
}

/// Collect every regular file under `root`, sorted by path.
///
/// Directories whose name appears in `excluded_dirs` are pruned at any depth.
/// Symlinks are not followed.
pub fn collect_files(root: &Path, excluded_dirs: &[String]) -> Result<Vec<TreeFile>> {
    if !root.is_dir() {
        return Err(ModkitError::NotFound(root.display().to_string()));
    }

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !excluded_dirs
                    .iter()
                    .any(|name| entry.file_name() == name.as_str())
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            ModkitError::fs("walk", path)(err.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push(TreeFile {
            relative: relative_name(rel),
            path: entry.path().to_path_buf(),
        });
    }

    Ok(files)
}

/// Join path components with `/` regardless of platform.
pub fn relative_name(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
