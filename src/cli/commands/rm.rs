//! skillpack rm - Remove a skill or a raw prefix

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::package::normalize_prefix;

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Slug of the skill to remove (all versions)
    #[arg(required_unless_present = "prefix")]
    pub slug: Option<String>,

    /// Team scope (personal when omitted)
    #[arg(long)]
    pub team: Option<String>,

    /// Remove every key under this prefix instead, e.g. a leftover staging prefix
    #[arg(long, conflicts_with_all = ["slug", "team"])]
    pub prefix: Option<String>,
}

pub fn run(ctx: &AppContext, args: &RmArgs) -> Result<()> {
    let (target, removed) = if let Some(prefix) = &args.prefix {
        let prefix = normalize_prefix(prefix)?;
        let removed = ctx.store()?.delete_prefix(&prefix)?;
        (prefix, removed)
    } else {
        let slug = args.slug.as_deref().unwrap_or_default();
        let removed = ctx
            .library()?
            .delete_skill(&AppContext::scope(args.team.as_ref()), slug)?;
        (slug.to_string(), removed)
    };

    if ctx.machine() {
        return emit_json(&serde_json::json!({ "target": target, "removed": removed }));
    }
    println!("Removed {removed} object(s) for {target}");
    Ok(())
}
