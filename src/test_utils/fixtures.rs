use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::manifest::{MANIFEST_FILENAME, MODULE_FILENAME};

/// Isolated `modules/` tree for manifest, archive and sync tests.
pub struct ModuleTreeFixture {
    pub temp_dir: TempDir,
    modules_dir: PathBuf,
}

impl ModuleTreeFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let modules_dir = temp_dir.path().join("modules");
        std::fs::create_dir_all(&modules_dir).expect("Failed to create modules dir");
        Self {
            temp_dir,
            modules_dir,
        }
    }

    /// The temp directory holding `modules/`.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.modules_dir.join(MANIFEST_FILENAME)
    }

    /// Write a file relative to `modules/`.
    pub fn file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.modules_dir.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    pub fn manifest(&self, content: &str) -> PathBuf {
        self.file(MANIFEST_FILENAME, content)
    }

    /// Create a module directory with a valid `module.toml`.
    pub fn module(&self, relative_path: &str, package_id: &str, extra_resources: &[&str]) -> PathBuf {
        let id = relative_path.rsplit('/').next().unwrap_or(relative_path);
        let mut descriptor = format!(
            "[module]\nid = \"{id}\"\npackage_id = \"{package_id}\"\ntitle = \"{id} module\"\n"
        );
        for location in extra_resources {
            descriptor.push_str(&format!("\n[[extra_resources]]\nlocation = \"{location}\"\n"));
        }
        self.file(&format!("{relative_path}/{MODULE_FILENAME}"), &descriptor);
        self.modules_dir.join(relative_path)
    }
}

impl Default for ModuleTreeFixture {
    fn default() -> Self {
        Self::new()
    }
}
