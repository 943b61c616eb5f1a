//! skillpack parse - Show front-matter and recognized sections

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::document::parse;
use crate::error::Result;

use super::read_text_input;

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// SKILL.md path, or `-` for stdin
    pub file: PathBuf,
}

pub fn run(ctx: &AppContext, args: &ParseArgs) -> Result<()> {
    let raw = read_text_input(&args.file)?;
    let doc = parse(&raw)?;

    if ctx.machine() {
        return emit_json(&doc);
    }

    let fm = &doc.front_matter;
    let mut layout = HumanLayout::new();
    layout
        .title(fm.name())
        .kv("description", fm.description().trim())
        .kv("version", &fm.version().to_string())
        .kv(
            "tags",
            &if fm.tags().is_empty() {
                "-".to_string()
            } else {
                fm.tags().join(", ")
            },
        )
        .section("Sections");
    for (key, text) in doc.sections.iter() {
        layout.bullet(&format!("{} ({} chars)", key.title(), text.chars().count()));
    }
    emit_human(&layout);
    Ok(())
}
