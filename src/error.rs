use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModkitError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{action} {}: {source}", .path.display())]
    Fs {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Base path '{}' does not exist", .0.display())]
    BasePathMissing(PathBuf),

    #[error("Package '{package}' module path '{module}' does not exist at '{}'", .path.display())]
    ModulePathMissing {
        package: String,
        module: String,
        path: PathBuf,
    },

    #[error(
        "Package '{package}' module path '{module}' does not have a module.toml file and is not a valid module"
    )]
    NotAModule { package: String, module: String },

    #[error("Package '{package}' module '{module}' refers to a non-existent file: {}", .path.display())]
    MissingResource {
        package: String,
        module: String,
        path: PathBuf,
    },

    #[error("Invalid TOML format in {}: {message}", .path.display())]
    InvalidToml { path: PathBuf, message: String },

    #[error("No packages defined")]
    NoPackages,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} failed: HTTP {status}")]
    Transport { operation: String, status: u16 },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ModkitError {
    /// `map_err` adapter tagging an I/O error with what was being done to `path`.
    pub fn fs(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Fs {
            action,
            path,
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModkitError>;
