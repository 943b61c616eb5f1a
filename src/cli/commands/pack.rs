//! skillpack pack - Archive a package directory

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::archive;
use crate::cli::output::emit_json;
use crate::document::parse;
use crate::error::Result;
use crate::package::{archive_name, slugify};

use super::read_package_dir;

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Directory holding SKILL.md and its files
    pub dir: PathBuf,

    /// Archive path (default: <slug>-v<version>.tar.gz)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &PackArgs) -> Result<()> {
    let files = read_package_dir(&args.dir)?;
    let text = files[0].content.as_text().unwrap_or_default();
    let doc = parse(text)?;
    let bytes = archive::pack(&files)?;

    let output = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(archive_name(
            &slugify(doc.front_matter.name()),
            doc.front_matter.version(),
        ))
    });
    std::fs::write(&output, &bytes)?;

    if ctx.machine() {
        emit_json(&serde_json::json!({
            "archive": output,
            "bytes": bytes.len(),
            "files": files.iter().map(|f| &f.path).collect::<Vec<_>>(),
        }))
    } else {
        println!(
            "Packed {} file(s) into {} ({} bytes)",
            files.len(),
            output.display(),
            bytes.len()
        );
        Ok(())
    }
}
