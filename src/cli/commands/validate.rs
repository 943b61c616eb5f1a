//! skillpack validate - Check a SKILL.md for errors and quality warnings

use std::path::PathBuf;

use clap::Args;
use console::style;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::document::validate;
use crate::error::{Result, SkillError};

use super::read_text_input;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// SKILL.md path, or `-` for stdin
    pub file: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let raw = read_text_input(&args.file)?;
    let report = validate(&raw);

    if ctx.machine() {
        emit_json(&report)?;
    } else {
        for error in &report.errors {
            println!("{} {error}", style("error:").red().bold());
        }
        for warning in &report.warnings {
            println!("{} {warning}", style("warning:").yellow());
        }
        if report.valid {
            println!("{} {}", style("✓").green(), args.file.display());
        }
    }

    if !report.valid {
        return Err(SkillError::ValidationFailed(report.errors.join("; ")));
    }
    if args.strict && !report.warnings.is_empty() {
        return Err(SkillError::ValidationFailed(format!(
            "{} warning(s) in strict mode",
            report.warnings.len()
        )));
    }
    Ok(())
}
