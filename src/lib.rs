pub mod app;
pub mod archive;
pub mod cdn;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod test_utils;
pub mod utils;

pub use error::{ModkitError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
