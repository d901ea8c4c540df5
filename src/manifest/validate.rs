//! Strict, fail-fast validation of a package manifest and the module tree it
//! references.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ModkitError, Result};
use crate::manifest::types::{Library, ModuleDescriptor, Package};

/// Manifest file name inside the modules directory.
pub const MANIFEST_FILENAME: &str = "packages.toml";

/// Descriptor file every module directory must contain.
pub const MODULE_FILENAME: &str = "module.toml";

/// Default manifest location relative to the working directory.
pub const DEFAULT_MANIFEST_PATH: &str = "modules/packages.toml";

/// Summary of one validated package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSummary {
    /// Table name under `[packages]`.
    pub name: String,
    pub id: String,
    pub title: String,
    /// Module paths in declaration order.
    pub modules: Vec<String>,
    pub can_cherry_pick: bool,
}

/// Outcome of a successful validation run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub library: Library,
    /// Packages in declaration order.
    pub packages: Vec<PackageSummary>,
    /// Number of module references checked across all packages.
    pub modules_validated: usize,
}

/// Validates `packages.toml` against the modules on disk.
///
/// Module paths and extra-resource locations are resolved against the
/// manifest's own directory.
#[derive(Debug, Clone)]
pub struct ManifestValidator {
    manifest_path: PathBuf,
    base_dir: PathBuf,
}

impl ManifestValidator {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        let manifest_path = manifest_path.into();
        let base_dir = match manifest_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            manifest_path,
            base_dir,
        }
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Run every check, stopping at the first failure.
    pub fn validate(&self) -> Result<ValidationReport> {
        if !self.base_dir.is_dir() {
            return Err(ModkitError::BasePathMissing(self.base_dir.clone()));
        }

        let mut document = self.load_manifest()?;
        info!("Successfully parsed {}", self.manifest_path.display());

        let library: Library = document
            .remove("library")
            .ok_or_else(|| ModkitError::ValidationFailed("Missing [library] header".to_string()))?
            .try_into()
            .map_err(|err| {
                ModkitError::ValidationFailed(format!("Invalid [library] header: {err}"))
            })?;
        library.validate()?;
        info!("[library] header validation passed");

        let packages = match document.remove("packages") {
            None => {
                return Err(ModkitError::ValidationFailed(
                    "Missing [packages] section".to_string(),
                ));
            }
            Some(toml::Value::Table(table)) => table,
            Some(other) => {
                return Err(ModkitError::ValidationFailed(format!(
                    "[packages] must be a table, got {}",
                    other.type_str()
                )));
            }
        };
        if packages.is_empty() {
            return Err(ModkitError::NoPackages);
        }
        info!("Found {} packages", packages.len());

        let mut summaries = Vec::with_capacity(packages.len());
        let mut modules_validated = 0;
        for (name, value) in packages {
            debug!(package = %name, "validating package");
            let package: Package = value.try_into().map_err(|err| {
                ModkitError::ValidationFailed(format!(
                    "Package '{name}' has invalid structure: {err}"
                ))
            })?;
            package.validate(&name)?;
            info!("Package '{name}' structure validation passed");

            for module_path in &package.modules {
                self.validate_module(&name, module_path)?;
                modules_validated += 1;
            }

            summaries.push(PackageSummary {
                id: package.id,
                title: package.title,
                modules: package.modules,
                can_cherry_pick: package.can_cherry_pick,
                name,
            });
        }

        Ok(ValidationReport {
            library,
            packages: summaries,
            modules_validated,
        })
    }

    fn load_manifest(&self) -> Result<toml::Table> {
        if !self.manifest_path.is_file() {
            return Err(ModkitError::NotFound(
                self.manifest_path.display().to_string(),
            ));
        }
        let raw = fs::read_to_string(&self.manifest_path)
            .map_err(ModkitError::fs("read", &self.manifest_path))?;
        toml::from_str(&raw).map_err(|err| ModkitError::InvalidToml {
            path: self.manifest_path.clone(),
            message: err.to_string(),
        })
    }

    /// Check one module reference of `package_name`.
    pub fn validate_module(
        &self,
        package_name: &str,
        module_path: &str,
    ) -> Result<ModuleDescriptor> {
        let full_path = self.base_dir.join(module_path);
        if !full_path.exists() {
            return Err(ModkitError::ModulePathMissing {
                package: package_name.to_string(),
                module: module_path.to_string(),
                path: full_path,
            });
        }

        let descriptor_path = full_path.join(MODULE_FILENAME);
        if !descriptor_path.is_file() {
            return Err(ModkitError::NotAModule {
                package: package_name.to_string(),
                module: module_path.to_string(),
            });
        }

        let raw = fs::read_to_string(&descriptor_path)
            .map_err(ModkitError::fs("read", &descriptor_path))?;
        let table: toml::Table = toml::from_str(&raw).map_err(|err| {
            ModkitError::ValidationFailed(format!(
                "Package '{package_name}' module '{module_path}' has invalid TOML in module.toml: {err}"
            ))
        })?;
        let descriptor: ModuleDescriptor =
            toml::Value::Table(table).try_into().map_err(|err| {
                ModkitError::ValidationFailed(format!(
                    "Package '{package_name}' module '{module_path}' has invalid module.toml structure: {err}"
                ))
            })?;
        descriptor.validate().map_err(|err| {
            ModkitError::ValidationFailed(format!(
                "Package '{package_name}' module '{module_path}' has invalid module.toml structure: {err}"
            ))
        })?;

        for resource in &descriptor.extra_resources {
            let resource_path = self.base_dir.join(&resource.location);
            if !resource_path.exists() {
                return Err(ModkitError::MissingResource {
                    package: package_name.to_string(),
                    module: module_path.to_string(),
                    path: resource_path,
                });
            }
        }

        debug!(module = %module_path, "module validated");
        Ok(descriptor)
    }
}
