//! skillpack url - Signed read URL for a stored file

use std::time::Duration;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::{Result, SkillError};

#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Version prefix, e.g. skills/_personal/demo/v1/
    pub prefix: String,

    /// File path inside the package
    #[arg(default_value = "SKILL.md")]
    pub path: String,

    /// Lifetime in seconds (default from config)
    #[arg(long)]
    pub ttl: Option<u64>,
}

pub fn run(ctx: &AppContext, args: &UrlArgs) -> Result<()> {
    if ctx.config.storage.signing_secret.is_empty() {
        return Err(SkillError::MissingConfig("storage.signing_secret".to_string()));
    }
    let ttl = args.ttl.map_or_else(|| ctx.default_url_ttl(), Duration::from_secs);
    let url = ctx.library()?.signed_url(&args.prefix, &args.path, ttl)?;

    if ctx.machine() {
        return emit_json(&serde_json::json!({ "url": url, "ttl_secs": ttl.as_secs() }));
    }
    println!("{url}");
    Ok(())
}
