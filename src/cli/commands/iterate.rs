//! skillpack iterate - Store a revised SKILL.md as the next version

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::package::StaticRevision;

use super::{print_stored, read_text_input};

#[derive(Args, Debug)]
pub struct IterateArgs {
    /// Current version prefix, e.g. skills/_personal/demo/v1/
    pub prefix: String,

    /// Revised SKILL.md, or `-` for stdin
    #[arg(long)]
    pub content: PathBuf,

    /// Changelog line for the new version
    #[arg(long, default_value = "Revised")]
    pub changelog: String,

    /// Feedback the revision addresses
    #[arg(long, default_value = "")]
    pub feedback: String,
}

pub fn run(ctx: &AppContext, args: &IterateArgs) -> Result<()> {
    let revision = StaticRevision {
        content: read_text_input(&args.content)?,
        changelog: args.changelog.clone(),
    };
    let iteration = ctx
        .library()?
        .iterate(&args.prefix, &args.feedback, &revision)?;

    if ctx.machine() {
        return emit_json(&iteration);
    }
    print_stored(ctx, &iteration.stored, "Stored")?;
    println!("\nchangelog: {}", iteration.changelog);
    Ok(())
}
