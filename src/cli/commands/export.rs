//! skillpack export - Export a stored version

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::package::StoragePath;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Version prefix, e.g. skills/_personal/demo/v1/
    pub prefix: String,

    /// Write the legacy JSON bundle instead of a .tar.gz
    #[arg(long)]
    pub legacy: bool,

    /// Output path (default: <slug>-v<version>.tar.gz or .json)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &ExportArgs) -> Result<()> {
    let library = ctx.library()?;

    if args.legacy {
        let bytes = library.export_legacy(&args.prefix)?;
        let output = match &args.output {
            Some(path) => path.clone(),
            None => {
                let path = StoragePath::parse(&args.prefix)?;
                PathBuf::from(format!("{}-v{}.json", path.slug, path.version))
            }
        };
        std::fs::write(&output, &bytes)?;
        if ctx.machine() {
            return emit_json(&serde_json::json!({ "bundle": output, "bytes": bytes.len() }));
        }
        println!("Wrote legacy bundle {} ({} bytes)", output.display(), bytes.len());
        return Ok(());
    }

    let (bytes, metadata) = library.export_archive(&args.prefix)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&metadata.archive_name));
    std::fs::write(&output, &bytes)?;

    if ctx.machine() {
        return emit_json(&serde_json::json!({ "archive": output, "metadata": metadata }));
    }
    println!(
        "Exported {} v{} ({} file(s)) to {}",
        metadata.name,
        metadata.version,
        metadata.files.len(),
        output.display()
    );
    Ok(())
}
