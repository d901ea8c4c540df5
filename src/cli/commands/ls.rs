//! modkit ls - List objects under the CDN prefix

use clap::Args;

use crate::app::AppContext;
use crate::cdn::{GcsClient, ObjectStore, RemoteObject, ServiceAccountKey};
use crate::error::Result;
use crate::utils::format::format_size;

#[derive(Args, Debug, Default)]
pub struct LsArgs {
    /// Bucket name (default: cdn.bucket)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Key prefix to list (default: cdn.prefix)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Print object sizes
    #[arg(long, short)]
    pub long: bool,
}

pub fn run(ctx: &AppContext, args: &LsArgs) -> Result<()> {
    let cdn = &ctx.config.cdn;
    let key = ServiceAccountKey::from_env(&cdn.credentials_env)?;

    let bucket = args.bucket.as_deref().unwrap_or(&cdn.bucket);
    let prefix = list_prefix(args.prefix.as_deref().unwrap_or(&cdn.prefix));
    let client = GcsClient::connect(&key, &cdn.endpoint, bucket)?;

    let objects = client.list(&prefix)?;
    for object in &objects {
        println!("{}", render(object, args.long));
    }
    Ok(())
}

/// A non-empty prefix lists the "directory", not sibling keys sharing the stem.
fn list_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

fn render(object: &RemoteObject, long: bool) -> String {
    if long {
        format!("{:>10}  {}", format_size(object.size), object.name)
    } else {
        object.name.clone()
    }
}
