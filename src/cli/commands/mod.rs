//! Command implementations

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod build;
pub mod ls;
pub mod sync;
pub mod validate;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Build(args) => build::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
        Commands::Sync(args) => sync::run(ctx, args),
        Commands::Ls(args) => ls::run(ctx, args),
    }
}
