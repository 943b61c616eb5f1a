//! skillpack push - Store a package directory as a new skill

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::document::{CreateSkillInput, SKILL_FILE, parse};
use crate::error::{Result, SkillError};

use super::{print_stored, read_package_dir};

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Directory holding SKILL.md and its files
    pub dir: PathBuf,

    /// Team scope (personal when omitted)
    #[arg(long)]
    pub team: Option<String>,
}

pub fn run(ctx: &AppContext, args: &PushArgs) -> Result<()> {
    let mut files = read_package_dir(&args.dir)?;
    let document = files.remove(0);
    let text = document
        .content
        .as_text()
        .ok_or_else(|| {
            SkillError::MalformedFrontMatter(format!(
                "{}/{SKILL_FILE} is not valid UTF-8",
                args.dir.display()
            ))
        })?
        .to_string();
    let doc = parse(&text)?;

    let input = CreateSkillInput {
        name: doc.front_matter.name().to_string(),
        description: doc.front_matter.description().to_string(),
        tags: doc.front_matter.tags().to_vec(),
        ..CreateSkillInput::default()
    };
    let library = ctx.library()?;
    let stored = library.create(&input, Some(&text), &files, &AppContext::scope(args.team.as_ref()))?;
    print_stored(ctx, &stored, "Stored")
}
