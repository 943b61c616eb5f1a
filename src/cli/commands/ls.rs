//! skillpack ls - List stored keys

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::storage::validate_prefix;

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Key prefix to list
    #[arg(default_value = "skills/")]
    pub prefix: String,

    /// List stored versions of this slug instead (uses --team)
    #[arg(long, conflicts_with = "prefix")]
    pub versions: Option<String>,

    /// Team scope for --versions (personal when omitted)
    #[arg(long, requires = "versions")]
    pub team: Option<String>,
}

pub fn run(ctx: &AppContext, args: &LsArgs) -> Result<()> {
    if let Some(slug) = &args.versions {
        let versions = ctx
            .library()?
            .versions(&AppContext::scope(args.team.as_ref()), slug)?;
        if ctx.machine() {
            return emit_json(&serde_json::json!({ "slug": slug, "versions": versions }));
        }
        for version in versions {
            println!("v{version}");
        }
        return Ok(());
    }

    validate_prefix(&args.prefix)?;
    let keys = ctx.store()?.list(&args.prefix)?;
    if ctx.machine() {
        return emit_json(&keys);
    }
    for key in keys {
        println!("{key}");
    }
    Ok(())
}
