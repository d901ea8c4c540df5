//! modkit build - Package the modules directory

use std::path::PathBuf;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::archive::{ArchiveOptions, build_archive};
use crate::error::Result;
use crate::utils::format::format_archive_size;

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Directory to archive (default: archive.source_dir)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Archive file name; `.zip` is appended when missing
    #[arg(long, short)]
    pub output: Option<String>,

    /// Additional directory names to leave out (repeatable)
    #[arg(long = "exclude", value_name = "DIR")]
    pub exclude: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &BuildArgs) -> Result<()> {
    let options = options_for(ctx, args);
    let report = build_archive(&options)?;

    for entry in &report.entries {
        println!("  Adding: {entry}");
    }
    println!(
        "{} Created {} with {} files",
        style("✓").green().bold(),
        report.output.display(),
        report.entries.len()
    );
    println!("Archive size: {}", format_archive_size(report.size));
    println!("Archive hash: sha256:{}", report.sha256);
    println!("Source directory: {}", options.source_dir.display());
    Ok(())
}

fn options_for(ctx: &AppContext, args: &BuildArgs) -> ArchiveOptions {
    let archive = &ctx.config.archive;
    let source = args
        .source
        .clone()
        .unwrap_or_else(|| archive.source_dir.clone());
    let output = args.output.as_deref().unwrap_or(&archive.output);

    let mut exclude = archive.exclude_dirs.clone();
    for name in &args.exclude {
        if !exclude.contains(name) {
            exclude.push(name.clone());
        }
    }

    ArchiveOptions::new(source, output).with_exclude_dirs(exclude)
}
