//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;

/// skillpack - package, validate and move SKILL.md skill packages
#[derive(Parser, Debug)]
#[command(name = "skillpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Machine-readable JSON output (shorthand for --output-format=json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/skillpack/config.toml)
    #[arg(long, global = true, env = "SKILLPACK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective output format. `--output-format` wins over `--machine`.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if let Some(fmt) = self.output_format {
            return fmt;
        }
        if self.machine {
            return OutputFormat::Json;
        }
        OutputFormat::Human
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a SKILL.md and show its front-matter and sections
    Parse(commands::parse::ParseArgs),

    /// Validate a SKILL.md (errors block, warnings advise)
    Validate(commands::validate::ValidateArgs),

    /// Render a new SKILL.md from the canonical template
    New(commands::new::NewArgs),

    /// Print the slug derived from a name
    Slug(commands::slug::SlugArgs),

    /// Pack a package directory into a .tar.gz archive
    Pack(commands::pack::PackArgs),

    /// Unpack a .tar.gz archive into a directory
    Unpack(commands::unpack::UnpackArgs),

    /// Store a package directory as version 1 of a new skill
    Push(commands::push::PushArgs),

    /// List stored keys under a prefix
    Ls(commands::ls::LsArgs),

    /// Check that a stored version is publishable
    Check(commands::check::CheckArgs),

    /// Store a revised SKILL.md as the next version
    Iterate(commands::iterate::IterateArgs),

    /// Export a stored version as an archive or legacy JSON bundle
    Export(commands::export::ExportArgs),

    /// Import an archive or legacy JSON bundle into storage
    Import(commands::import::ImportArgs),

    /// Print a signed read URL for a stored file
    Url(commands::url::UrlArgs),

    /// Remove a skill (all versions) or a raw prefix
    Rm(commands::rm::RmArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn machine_flag_selects_json() {
        let cli = Cli::parse_from(["skillpack", "-m", "slug", "Demo"]);
        assert_eq!(cli.output_format(), OutputFormat::Json);
        let cli = Cli::parse_from(["skillpack", "-m", "-O", "human", "slug", "Demo"]);
        assert_eq!(cli.output_format(), OutputFormat::Human);
    }
}
