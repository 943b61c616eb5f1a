//! skillpack unpack - Extract an archive

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::archive::{self, FileEntry};
use crate::cli::output::emit_json;
use crate::error::{Result, SkillError};

use super::{read_input, write_package_dir};

#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Archive path, or `-` for stdin
    pub archive: PathBuf,

    /// Destination directory
    #[arg(long, short, conflicts_with = "list")]
    pub output: Option<PathBuf>,

    /// Only list entries
    #[arg(long)]
    pub list: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryRow<'a> {
    path: &'a str,
    size: usize,
    content_type: String,
}

impl<'a> From<&'a FileEntry> for EntryRow<'a> {
    fn from(entry: &'a FileEntry) -> Self {
        Self {
            path: &entry.path,
            size: entry.size(),
            content_type: entry.resolved_content_type(),
        }
    }
}

pub fn run(ctx: &AppContext, args: &UnpackArgs) -> Result<()> {
    let bytes = read_input(&args.archive)?;
    let files = archive::unpack(&bytes)?;
    let rows: Vec<EntryRow<'_>> = files.iter().map(EntryRow::from).collect();

    if args.list {
        if ctx.machine() {
            return emit_json(&rows);
        }
        for row in &rows {
            println!("{:>10}  {:<26} {}", row.size, row.content_type, row.path);
        }
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .ok_or_else(|| SkillError::ValidationFailed("pass --output <dir> or --list".to_string()))?;
    let written = write_package_dir(&output, &files)?;

    if ctx.machine() {
        emit_json(&serde_json::json!({ "output": output, "files": rows }))
    } else {
        println!("Extracted {} file(s) to {}", written.len(), output.display());
        Ok(())
    }
}
