//! modkit sync - Publish a directory to the CDN bucket

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use crate::app::AppContext;
use crate::cdn::{GcsClient, ServiceAccountKey, SyncOptions, sync_directory};
use crate::error::Result;
use crate::utils::format::format_size;

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Local directory to upload (default: cdn.source_dir)
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Bucket name (default: cdn.bucket)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Key prefix inside the bucket (default: cdn.prefix)
    #[arg(long)]
    pub prefix: Option<String>,
}

pub fn run(ctx: &AppContext, args: &SyncArgs) -> Result<()> {
    let cdn = &ctx.config.cdn;
    // Credentials come first: nothing is walked or sent without them.
    let key = ServiceAccountKey::from_env(&cdn.credentials_env)?;

    let options = SyncOptions {
        source_dir: args
            .source
            .clone()
            .unwrap_or_else(|| cdn.source_dir.clone()),
        prefix: args.prefix.clone().unwrap_or_else(|| cdn.prefix.clone()),
    };
    // Checked here as well as in sync_directory so a bad path fails before authentication.
    options.check_source()?;

    let bucket = args.bucket.as_deref().unwrap_or(&cdn.bucket);
    let client = GcsClient::connect(&key, &cdn.endpoint, bucket)?;
    info!(bucket, prefix = %options.prefix, "syncing {}", options.source_dir.display());

    let report = sync_directory(&client, &options)?;

    println!(
        "{} Synced {} to gs://{}/{}",
        style("✓").green().bold(),
        options.source_dir.display(),
        client.bucket(),
        options.prefix.trim_matches('/')
    );
    println!(
        "Uploaded: {} ({}), skipped: {}",
        report.uploaded.len(),
        format_size(report.bytes_uploaded),
        report.skipped.len()
    );
    Ok(())
}
