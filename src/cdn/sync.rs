//! Upload a local tree to an object store, skipping keys already present.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::cdn::store::{ObjectStore, PutOutcome};
use crate::error::{ModkitError, Result};
use crate::utils::fs::collect_files;

pub const DEFAULT_PREFIX: &str = "toolkit";
pub const DEFAULT_SOURCE_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub source_dir: PathBuf,
    pub prefix: String,
}

impl SyncOptions {
    /// Fail with a missing-file error unless the source directory exists.
    pub fn check_source(&self) -> Result<()> {
        if self.source_dir.is_dir() {
            Ok(())
        } else {
            Err(ModkitError::NotFound(format!(
                "Source directory '{}'",
                self.source_dir.display()
            )))
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub uploaded: Vec<String>,
    pub skipped: Vec<String>,
    pub bytes_uploaded: u64,
}

impl SyncReport {
    pub fn total(&self) -> usize {
        self.uploaded.len() + self.skipped.len()
    }
}

/// Remote key for a file at `relative` under `prefix`.
pub fn destination_key(prefix: &str, relative: &str) -> String {
    let prefix = prefix.trim_matches('/');
    let relative = relative.replace('\\', "/");
    let relative = relative.trim_start_matches('/');
    if prefix.is_empty() {
        relative.to_string()
    } else {
        format!("{prefix}/{relative}")
    }
}

/// Upload every regular file under `options.source_dir`, in sorted order.
///
/// Keys that already exist are left untouched. The first transport error
/// aborts the run.
pub fn sync_directory(store: &dyn ObjectStore, options: &SyncOptions) -> Result<SyncReport> {
    options.check_source()?;

    let files = collect_files(&options.source_dir, &[])?;
    debug!(
        source = %options.source_dir.display(),
        files = files.len(),
        "syncing tree"
    );

    let mut report = SyncReport::default();
    for file in files {
        let key = destination_key(&options.prefix, &file.relative);
        if store.exists(&key)? {
            info!("File {key} already exists, skipping");
            report.skipped.push(key);
            continue;
        }

        match store.upload_file(&key, &file.path)? {
            PutOutcome::Created => {
                let bytes = std::fs::metadata(&file.path)
                    .map_err(ModkitError::fs("stat", &file.path))?
                    .len();
                info!("Uploaded {} to {key}", file.relative);
                report.bytes_uploaded += bytes;
                report.uploaded.push(key);
            }
            PutOutcome::AlreadyExists => {
                info!("File {key} appeared during upload, skipping");
                report.skipped.push(key);
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdn::store::MemoryStore;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("nested")).unwrap();
        std::fs::write(temp.path().join("a.txt"), "alpha").unwrap();
        std::fs::write(temp.path().join("nested/b.json"), "{}").unwrap();
        temp
    }

    fn options(temp: &TempDir) -> SyncOptions {
        SyncOptions {
            source_dir: temp.path().to_path_buf(),
            prefix: "toolkit".to_string(),
        }
    }

    #[test]
    fn destination_key_joins_prefix() {
        assert_eq!(destination_key("toolkit", "a/b.txt"), "toolkit/a/b.txt");
        assert_eq!(destination_key("toolkit/", "/a.txt"), "toolkit/a.txt");
        assert_eq!(destination_key("", "a.txt"), "a.txt");
        assert_eq!(destination_key("cdn/v1", "x\\y.txt"), "cdn/v1/x/y.txt");
    }

    #[test]
    fn uploads_every_file_once() {
        let temp = tree();
        let store = MemoryStore::new();

        let report = sync_directory(&store, &options(&temp)).unwrap();

        assert_eq!(report.uploaded, vec!["toolkit/a.txt", "toolkit/nested/b.json"]);
        assert!(report.skipped.is_empty());
        assert_eq!(report.bytes_uploaded, 7);
        assert_eq!(store.get("toolkit/nested/b.json").unwrap(), b"{}");
    }

    #[test]
    fn second_run_uploads_nothing() {
        let temp = tree();
        let store = MemoryStore::new();

        sync_directory(&store, &options(&temp)).unwrap();
        let second = sync_directory(&store, &options(&temp)).unwrap();

        assert!(second.uploaded.is_empty());
        assert_eq!(second.skipped.len(), 2);
        assert_eq!(second.bytes_uploaded, 0);
        assert_eq!(store.upload_count(), 2);
    }

    #[test]
    fn existing_objects_are_not_overwritten() {
        let temp = tree();
        let store = MemoryStore::new();
        store.insert("toolkit/a.txt", "remote");

        let report = sync_directory(&store, &options(&temp)).unwrap();

        assert_eq!(report.skipped, vec!["toolkit/a.txt"]);
        assert_eq!(report.uploaded, vec!["toolkit/nested/b.json"]);
        assert_eq!(store.get("toolkit/a.txt").unwrap(), b"remote");
    }

    #[test]
    fn missing_source_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let opts = SyncOptions {
            source_dir: temp.path().join("data"),
            prefix: "toolkit".to_string(),
        };

        let err = sync_directory(&store, &opts).unwrap_err();
        assert!(matches!(err, ModkitError::NotFound(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn empty_prefix_uses_relative_keys() {
        let temp = tree();
        let store = MemoryStore::new();
        let opts = SyncOptions {
            source_dir: temp.path().to_path_buf(),
            prefix: String::new(),
        };

        let report = sync_directory(&store, &opts).unwrap();
        assert_eq!(report.uploaded, vec!["a.txt", "nested/b.json"]);
    }
}
