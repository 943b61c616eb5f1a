//! Per-invocation application context for the CLI.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::package::{Scope, SkillLibrary};
use crate::storage::{ObjectStore, open_store};

pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = std::env::var("SKILLPACK_ROOT")
            .map_or_else(|_| PathBuf::from(".skillpack"), PathBuf::from);
        let config = Config::load(cli.config.as_deref(), &root)?;
        Ok(Self {
            root,
            config,
            output_format: cli.output_format(),
        })
    }

    #[must_use]
    pub fn machine(&self) -> bool {
        self.output_format.is_machine_readable()
    }

    /// Open the configured store. Commands that never touch storage skip this.
    pub fn store(&self) -> Result<Arc<dyn ObjectStore>> {
        open_store(&self.config.storage)
    }

    pub fn library(&self) -> Result<SkillLibrary> {
        Ok(SkillLibrary::new(self.store()?, self.config.packages.clone()))
    }

    #[must_use]
    pub fn scope(team: Option<&String>) -> Scope {
        Scope::from_team(team.cloned())
    }

    #[must_use]
    pub fn default_url_ttl(&self) -> Duration {
        Duration::from_secs(self.config.storage.default_url_ttl_secs)
    }
}
