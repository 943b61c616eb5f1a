//! skillpack import - Import an archive or legacy bundle

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::app::AppContext;
use crate::error::Result;

use super::{print_stored, read_input};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum ImportFormat {
    /// Detect from the leading bytes
    #[default]
    Auto,
    /// gzip-compressed tar
    Archive,
    /// Legacy JSON bundle
    Legacy,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File to import, or `-` for stdin
    pub file: PathBuf,

    /// Team scope (personal when omitted)
    #[arg(long)]
    pub team: Option<String>,

    #[arg(long, value_enum, default_value_t)]
    pub format: ImportFormat,
}

fn detect(bytes: &[u8]) -> ImportFormat {
    if bytes.starts_with(&[0x1f, 0x8b]) {
        ImportFormat::Archive
    } else {
        ImportFormat::Legacy
    }
}

pub fn run(ctx: &AppContext, args: &ImportArgs) -> Result<()> {
    let bytes = read_input(&args.file)?;
    let format = match args.format {
        ImportFormat::Auto => detect(&bytes),
        other => other,
    };
    let scope = AppContext::scope(args.team.as_ref());
    let library = ctx.library()?;

    let stored = match format {
        ImportFormat::Legacy => library.import_legacy(&bytes, &scope)?,
        _ => library.import_archive(&bytes, &scope)?,
    };
    print_stored(ctx, &stored, "Imported")
}
