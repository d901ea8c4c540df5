use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::archive::{DEFAULT_ARCHIVE_NAME, DEFAULT_EXCLUDED_DIRS};
use crate::cdn::{
    DEFAULT_BUCKET, DEFAULT_CREDENTIALS_ENV, DEFAULT_ENDPOINT, DEFAULT_PREFIX, DEFAULT_SOURCE_DIR,
};
use crate::error::{ModkitError, Result};
use crate::manifest::DEFAULT_MANIFEST_PATH;

pub const CONFIG_ENV: &str = "MODKIT_CONFIG";
pub const PROJECT_CONFIG_FILE: &str = "modkit.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub manifest: ManifestConfig,
    #[serde(default)]
    pub cdn: CdnConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        Self::load_with(explicit_path, root, &|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with environment lookups routed through `env`.
    pub fn load_with(
        explicit_path: Option<&Path>,
        root: &Path,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                ModkitError::Config(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides(env);

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        // No config dir (minimal containers) just means no global layer.
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("modkit/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join(PROJECT_CONFIG_FILE))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            ModkitError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            ModkitError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.archive {
            self.archive.merge(patch);
        }
        if let Some(patch) = patch.manifest {
            self.manifest.merge(patch);
        }
        if let Some(patch) = patch.cdn {
            self.cdn.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self, env: &dyn Fn(&str) -> Option<String>) {
        if let Some(value) = env_string(env, "MODKIT_ARCHIVE_SOURCE_DIR") {
            self.archive.source_dir = PathBuf::from(value);
        }
        if let Some(value) = env_string(env, "MODKIT_ARCHIVE_OUTPUT") {
            self.archive.output = value;
        }
        if let Some(values) = env_list(env, "MODKIT_ARCHIVE_EXCLUDE_DIRS") {
            self.archive.exclude_dirs = values;
        }

        if let Some(value) = env_string(env, "MODKIT_MANIFEST_PATH") {
            self.manifest.path = PathBuf::from(value);
        }

        if let Some(value) = env_string(env, "MODKIT_CDN_BUCKET") {
            self.cdn.bucket = value;
        }
        // An empty prefix is meaningful (upload to the bucket root).
        if let Some(value) = env("MODKIT_CDN_PREFIX") {
            self.cdn.prefix = value;
        }
        if let Some(value) = env_string(env, "MODKIT_CDN_SOURCE_DIR") {
            self.cdn.source_dir = PathBuf::from(value);
        }
        if let Some(value) = env_string(env, "MODKIT_CDN_ENDPOINT") {
            self.cdn.endpoint = value;
        }
        if let Some(value) = env_string(env, "MODKIT_CDN_CREDENTIALS_ENV") {
            self.cdn.credentials_env = value;
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default)]
    pub source_dir: PathBuf,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("modules"),
            output: DEFAULT_ARCHIVE_NAME.to_string(),
            exclude_dirs: DEFAULT_EXCLUDED_DIRS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

impl ArchiveConfig {
    fn merge(&mut self, patch: ArchivePatch) {
        if let Some(value) = patch.source_dir {
            self.source_dir = value;
        }
        if let Some(value) = patch.output {
            self.output = value;
        }
        if let Some(values) = patch.exclude_dirs {
            self.exclude_dirs = values;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    #[serde(default)]
    pub path: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MANIFEST_PATH),
        }
    }
}

impl ManifestConfig {
    fn merge(&mut self, patch: ManifestPatch) {
        if let Some(value) = patch.path {
            self.path = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub source_dir: PathBuf,
    #[serde(default)]
    pub endpoint: String,
    /// Name of the environment variable holding the service-account JSON.
    #[serde(default)]
    pub credentials_env: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials_env: DEFAULT_CREDENTIALS_ENV.to_string(),
        }
    }
}

impl CdnConfig {
    fn merge(&mut self, patch: CdnPatch) {
        if let Some(value) = patch.bucket {
            self.bucket = value;
        }
        if let Some(value) = patch.prefix {
            self.prefix = value;
        }
        if let Some(value) = patch.source_dir {
            self.source_dir = value;
        }
        if let Some(value) = patch.endpoint {
            self.endpoint = value;
        }
        if let Some(value) = patch.credentials_env {
            self.credentials_env = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub archive: Option<ArchivePatch>,
    pub manifest: Option<ManifestPatch>,
    pub cdn: Option<CdnPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ArchivePatch {
    pub source_dir: Option<PathBuf>,
    pub output: Option<String>,
    pub exclude_dirs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ManifestPatch {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CdnPatch {
    pub bucket: Option<String>,
    pub prefix: Option<String>,
    pub source_dir: Option<PathBuf>,
    pub endpoint: Option<String>,
    pub credentials_env: Option<String>,
}

fn env_string(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key).filter(|value| !value.trim().is_empty())
}

fn env_list(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<Vec<String>> {
    env(key).map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}
