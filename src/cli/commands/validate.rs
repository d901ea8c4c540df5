//! modkit validate - Check packages.toml and module descriptors

use std::path::PathBuf;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::error::Result;
use crate::manifest::ManifestValidator;

#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Manifest to validate (default: manifest.path)
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let path = args
        .manifest
        .clone()
        .unwrap_or_else(|| ctx.config.manifest.path.clone());
    let validator = ManifestValidator::new(path);
    let report = validator.validate()?;

    let check = style("✓").green().bold();
    println!("{check} [library] {}", report.library.title);
    for package in &report.packages {
        println!(
            "{check} Package '{}' ({}): {} modules{}",
            package.name,
            package.id,
            package.modules.len(),
            if package.can_cherry_pick {
                ""
            } else {
                ", no cherry-pick"
            }
        );
        for module in &package.modules {
            println!("  {check} Module '{module}'");
        }
    }
    println!();
    println!(
        "{} packages, {} modules validated in {}",
        report.packages.len(),
        report.modules_validated,
        validator.manifest_path().display()
    );
    Ok(())
}
