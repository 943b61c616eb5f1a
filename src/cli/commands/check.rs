//! skillpack check - Validate a stored version before publishing

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Version prefix, e.g. skills/_personal/demo/v1/
    pub prefix: String,
}

pub fn run(ctx: &AppContext, args: &CheckArgs) -> Result<()> {
    let report = ctx.library()?.publish_check(&args.prefix)?;
    if ctx.machine() {
        return emit_json(&report);
    }
    for warning in &report.warnings {
        println!("{} {warning}", style("warning:").yellow());
    }
    println!("{} {} is publishable", style("✓").green(), args.prefix);
    Ok(())
}
