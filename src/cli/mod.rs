//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// modkit - Package, validate and publish toolkit modules
#[derive(Parser, Debug)]
#[command(name = "modkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ./modkit.toml over ~/.config/modkit/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Zip the modules directory and report its SHA-256
    Build(commands::build::BuildArgs),

    /// Validate packages.toml and every referenced module
    Validate(commands::validate::ValidateArgs),

    /// Upload a local directory to the CDN bucket, skipping existing keys
    Sync(commands::sync::SyncArgs),

    /// List objects under the CDN prefix
    Ls(commands::ls::LsArgs),
}
