//! skillpack new - Render a SKILL.md from the template

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::document::{CreateSkillInput, render_document};
use crate::error::{Result, SkillError};

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Skill name
    pub name: String,

    /// One-line description
    #[arg(long, short)]
    pub description: String,

    /// Tag (repeatable)
    #[arg(long = "tag", short)]
    pub tags: Vec<String>,

    /// Purpose section text
    #[arg(long)]
    pub purpose: Option<String>,

    /// Instructions section text
    #[arg(long)]
    pub instructions: Option<String>,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}

pub fn run(ctx: &AppContext, args: &NewArgs) -> Result<()> {
    let input = CreateSkillInput {
        name: args.name.clone(),
        description: args.description.clone(),
        tags: args.tags.clone(),
        purpose: args.purpose.clone(),
        instructions: args.instructions.clone(),
    };
    let text = render_document(&input)?;

    match &args.output {
        Some(path) => {
            if path.exists() && !args.force {
                return Err(SkillError::ValidationFailed(format!(
                    "{} exists; pass --force to overwrite",
                    path.display()
                )));
            }
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &text)?;
            if ctx.machine() {
                emit_json(&serde_json::json!({ "path": path, "bytes": text.len() }))?;
            } else {
                println!("Wrote {}", path.display());
            }
        }
        None if ctx.machine() => emit_json(&serde_json::json!({ "content": text }))?,
        None => print!("{text}"),
    }
    Ok(())
}
