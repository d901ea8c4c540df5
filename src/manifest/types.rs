//! Schema for `packages.toml` and `module.toml`.

use serde::{Deserialize, Serialize};

use crate::error::{ModkitError, Result};

fn default_true() -> bool {
    true
}

/// `[library]` header of `packages.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Library {
    pub title: String,
    pub description: String,
}

impl Library {
    pub fn validate(&self) -> Result<()> {
        validate_required("[library] title", &self.title)?;
        validate_required("[library] description", &self.description)
    }
}

/// One `[packages.<name>]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Package {
    pub title: String,
    pub id: String,
    pub description: String,
    pub modules: Vec<String>,
    #[serde(rename = "canCherryPick", default = "default_true")]
    pub can_cherry_pick: bool,
}

impl Package {
    pub fn validate(&self, name: &str) -> Result<()> {
        validate_required(&format!("Package '{name}' title"), &self.title)?;
        validate_required(&format!("Package '{name}' id"), &self.id)?;
        validate_required(&format!("Package '{name}' description"), &self.description)?;
        if self.modules.is_empty() {
            return Err(ModkitError::ValidationFailed(format!(
                "Package '{name}' modules list cannot be empty"
            )));
        }
        for module in &self.modules {
            validate_required(&format!("Package '{name}' module path"), module)?;
        }
        Ok(())
    }
}

/// The `[module]` table of a `module.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleInfo {
    pub id: String,
    pub package_id: String,
    pub title: String,
    #[serde(default = "default_true")]
    pub is_selected_by_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtraResource {
    pub location: String,
}

/// A parsed `module.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub module: ModuleInfo,
    #[serde(default)]
    pub extra_resources: Vec<ExtraResource>,
}

impl ModuleDescriptor {
    pub fn validate(&self) -> Result<()> {
        validate_required("module.id", &self.module.id)?;
        validate_required("module.package_id", &self.module.package_id)?;
        validate_required("module.title", &self.module.title)?;
        for resource in &self.extra_resources {
            validate_required("extra_resources.location", &resource.location)?;
        }
        Ok(())
    }
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ModkitError::ValidationFailed(format!(
            "{field} must be a non-empty string"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MODULE: &str = r#"
[module]
id = "dp:quickstart"
package_id = "dp:quickstart"
title = "Quickstart data pipeline"

[[extra_resources]]
location = "shared/sources.yaml"
"#;

    #[test]
    fn parses_module_descriptor_with_defaults() {
        let descriptor: ModuleDescriptor = toml::from_str(SAMPLE_MODULE).unwrap();
        assert_eq!(descriptor.module.id, "dp:quickstart");
        assert!(descriptor.module.is_selected_by_default);
        assert_eq!(descriptor.extra_resources.len(), 1);
        assert_eq!(descriptor.extra_resources[0].location, "shared/sources.yaml");
        descriptor.validate().unwrap();
    }

    #[test]
    fn extra_resources_are_optional() {
        let descriptor: ModuleDescriptor = toml::from_str(
            "[module]\nid = \"a\"\npackage_id = \"p\"\ntitle = \"A\"\nis_selected_by_default = false\n",
        )
        .unwrap();
        assert!(descriptor.extra_resources.is_empty());
        assert!(!descriptor.module.is_selected_by_default);
    }

    #[test]
    fn module_missing_package_id_is_rejected() {
        let err = toml::from_str::<ModuleDescriptor>("[module]\nid = \"a\"\ntitle = \"A\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("package_id"));
    }

    #[test]
    fn whitespace_title_fails_validation() {
        let descriptor: ModuleDescriptor =
            toml::from_str("[module]\nid = \"a\"\npackage_id = \"p\"\ntitle = \"  \"\n").unwrap();
        let err = descriptor.validate().unwrap_err();
        assert!(err.to_string().contains("module.title must be a non-empty string"));
    }

    #[test]
    fn package_cherry_pick_defaults_to_true() {
        let package: Package = toml::from_str(
            "title = \"Core\"\nid = \"core\"\ndescription = \"Core modules\"\nmodules = [\"a\"]\n",
        )
        .unwrap();
        assert!(package.can_cherry_pick);

        let package: Package = toml::from_str(
            "title = \"Core\"\nid = \"core\"\ndescription = \"d\"\nmodules = [\"a\"]\ncanCherryPick = false\n",
        )
        .unwrap();
        assert!(!package.can_cherry_pick);
    }

    #[test]
    fn package_with_empty_modules_fails() {
        let package = Package {
            title: "Core".to_string(),
            id: "core".to_string(),
            description: "d".to_string(),
            modules: Vec::new(),
            can_cherry_pick: true,
        };
        let err = package.validate("core").unwrap_err();
        assert!(err.to_string().contains("Package 'core' modules list cannot be empty"));
    }

    #[test]
    fn library_requires_description() {
        let library = Library {
            title: "Library".to_string(),
            description: String::new(),
        };
        assert!(library.validate().unwrap_err().to_string().contains("[library] description"));
    }
}
