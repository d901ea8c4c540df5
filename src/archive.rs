//! Release archive building.
//!
//! Zips a module tree into a single deflated archive and computes its
//! SHA-256 digest for the release notes.

use std::fs::File;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::error::{ModkitError, Result};
use crate::utils::fs::collect_files;

/// Default archive name.
pub const DEFAULT_ARCHIVE_NAME: &str = "packages.zip";

/// Directory names never descended into.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["__pycache__", ".pytest_cache", ".git"];

/// Buffer size for reading files during checksum calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Permissions recorded for every entry.
const ENTRY_PERMISSIONS: u32 = 0o644;

#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    pub source_dir: PathBuf,
    pub output: PathBuf,
    pub exclude_dirs: Vec<String>,
}

impl ArchiveOptions {
    pub fn new(source_dir: impl Into<PathBuf>, output: impl AsRef<str>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output: normalize_output_name(output.as_ref()),
            exclude_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn with_exclude_dirs(mut self, exclude_dirs: Vec<String>) -> Self {
        self.exclude_dirs = exclude_dirs;
        self
    }
}

/// Result of building an archive.
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub output: PathBuf,
    /// Entry names in the order they were written.
    pub entries: Vec<String>,
    /// Archive size in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256 of the archive file.
    pub sha256: String,
}

/// Append `.zip` when the requested name lacks it; empty means the default.
pub fn normalize_output_name(name: &str) -> PathBuf {
    let name = name.trim();
    if name.is_empty() {
        return PathBuf::from(DEFAULT_ARCHIVE_NAME);
    }
    if name.ends_with(".zip") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.zip"))
    }
}

/// Build the archive described by `options`.
///
/// Entries are written in sorted order with a fixed timestamp and fixed
/// permissions, so an unchanged tree always produces the same bytes.
pub fn build_archive(options: &ArchiveOptions) -> Result<ArchiveReport> {
    let source = &options.source_dir;
    if !source.is_dir() {
        return Err(ModkitError::NotFound(format!(
            "{} directory",
            source.display()
        )));
    }

    let files = collect_files(source, &options.exclude_dirs)?;
    debug!(source = %source.display(), files = files.len(), "collected archive sources");

    let file = File::create(&options.output).map_err(ModkitError::fs("create", &options.output))?;
    let output_abs = options
        .output
        .canonicalize()
        .map_err(ModkitError::fs("resolve", &options.output))?;

    let entry_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS);

    let mut writer = ZipWriter::new(BufWriter::new(file));
    let mut entries = Vec::with_capacity(files.len());
    for tree_file in files {
        if tree_file.path.canonicalize().is_ok_and(|p| p == output_abs) {
            debug!(path = %tree_file.path.display(), "skipping archive output");
            continue;
        }

        debug!(entry = %tree_file.relative, "adding entry");
        writer.start_file(tree_file.relative.as_str(), entry_options)?;
        let mut input =
            File::open(&tree_file.path).map_err(ModkitError::fs("read", &tree_file.path))?;
        io::copy(&mut input, &mut writer)?;
        entries.push(tree_file.relative);
    }

    let mut buffered = writer.finish()?;
    io::Write::flush(&mut buffered)?;
    drop(buffered);

    let size = std::fs::metadata(&options.output)
        .map_err(ModkitError::fs("stat", &options.output))?
        .len();
    let sha256 = sha256_file(&options.output)?;

    Ok(ArchiveReport {
        output: options.output.clone(),
        entries,
        size,
        sha256,
    })
}

/// Calculate the SHA-256 checksum of a file in fixed-size chunks.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(ModkitError::fs("read", path))?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(ModkitError::fs("read", path))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
