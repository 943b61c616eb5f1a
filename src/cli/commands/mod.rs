//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::app::AppContext;
use crate::archive::{FileEntry, normalize_relative_path};
use crate::cli::Commands;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::document::SKILL_FILE;
use crate::error::{Result, SkillError};
use crate::package::StoredSkill;

pub mod check;
pub mod export;
pub mod import;
pub mod iterate;
pub mod ls;
pub mod new;
pub mod pack;
pub mod parse;
pub mod push;
pub mod rm;
pub mod slug;
pub mod unpack;
pub mod url;
pub mod validate;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Parse(args) => parse::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
        Commands::New(args) => new::run(ctx, args),
        Commands::Slug(args) => slug::run(ctx, args),
        Commands::Pack(args) => pack::run(ctx, args),
        Commands::Unpack(args) => unpack::run(ctx, args),
        Commands::Push(args) => push::run(ctx, args),
        Commands::Ls(args) => ls::run(ctx, args),
        Commands::Check(args) => check::run(ctx, args),
        Commands::Iterate(args) => iterate::run(ctx, args),
        Commands::Export(args) => export::run(ctx, args),
        Commands::Import(args) => import::run(ctx, args),
        Commands::Url(args) => url::run(ctx, args),
        Commands::Rm(args) => rm::run(ctx, args),
    }
}

/// Report a stored package version.
pub(crate) fn print_stored(ctx: &AppContext, stored: &StoredSkill, verb: &str) -> Result<()> {
    if ctx.machine() {
        return emit_json(stored);
    }
    let mut layout = HumanLayout::new();
    layout
        .title(&format!("{verb} {}", stored.path))
        .kv("name", &stored.skill.name)
        .kv("slug", &stored.skill.slug)
        .kv("version", &stored.skill.version.to_string())
        .section("Files");
    for entry in &stored.manifest {
        layout.bullet(&format!("{} ({} bytes, {})", entry.path, entry.size, entry.content_type));
    }
    emit_human(&layout);
    Ok(())
}

/// Read a file argument; `-` means stdin.
pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    fs::read(path).map_err(|err| {
        SkillError::Io(std::io::Error::new(err.kind(), format!("read {}: {err}", path.display())))
    })
}

pub(crate) fn read_text_input(path: &Path) -> Result<String> {
    String::from_utf8(read_input(path)?).map_err(|_| {
        SkillError::ValidationFailed(format!("{} is not valid UTF-8", path.display()))
    })
}

/// Collect a package directory as file entries, `SKILL.md` first and the
/// rest sorted by path.
pub(crate) fn read_package_dir(dir: &Path) -> Result<Vec<FileEntry>> {
    if !dir.is_dir() {
        return Err(SkillError::ValidationFailed(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            SkillError::Io(std::io::Error::other(format!("walk {}: {err}", dir.display())))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let bytes = fs::read(entry.path())?;
        files.push(FileEntry::classified(normalize_relative_path(&rel)?, bytes));
    }

    files.sort_by(|a, b| {
        (a.path != SKILL_FILE)
            .cmp(&(b.path != SKILL_FILE))
            .then_with(|| a.path.cmp(&b.path))
    });
    if files.first().is_none_or(|file| file.path != SKILL_FILE) {
        return Err(SkillError::MissingManifestRoot(dir.display().to_string()));
    }
    Ok(files)
}

/// Write file entries below `dir`, creating parents as needed.
pub(crate) fn write_package_dir(dir: &Path, files: &[FileEntry]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let rel = normalize_relative_path(&file.path)?;
        let target = rel.split('/').fold(dir.to_path_buf(), |path, segment| path.join(segment));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, file.content.as_bytes())?;
        written.push(target);
    }
    Ok(written)
}
