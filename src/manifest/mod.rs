//! Package manifest model and validation

pub mod types;
pub mod validate;

pub use types::{ExtraResource, Library, ModuleDescriptor, ModuleInfo, Package};
pub use validate::{
    DEFAULT_MANIFEST_PATH, MANIFEST_FILENAME, MODULE_FILENAME, ManifestValidator,
    PackageSummary, ValidationReport,
};
