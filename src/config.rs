use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillError};

/// Default lifetime of signed read URLs.
pub const DEFAULT_URL_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub packages: PackagesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_root(Path::new(".skillpack"))
    }
}

impl Config {
    /// Defaults for a skillpack root directory.
    #[must_use]
    pub fn for_root(root: &Path) -> Self {
        Self {
            storage: StorageConfig::for_root(root),
            packages: PackagesConfig::default(),
        }
    }

    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        Self::load_with_env(explicit_path, root, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`] with an injectable environment lookup.
    pub fn load_with_env(
        explicit_path: Option<&Path>,
        root: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::for_root(root);

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env("SKILLPACK_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?
                .ok_or_else(|| SkillError::Config(format!("config file {} not found", path.display())))?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides(&env)?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("skillpack/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SkillError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SkillError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.storage {
            self.storage.merge(patch);
        }
        if let Some(patch) = patch.packages {
            self.packages.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = env("SKILLPACK_STORAGE_BACKEND") {
            self.storage.backend = parse_backend(&value)?;
        }
        if let Some(value) = env("SKILLPACK_STORAGE_ROOT") {
            self.storage.root = PathBuf::from(value);
        }
        if let Some(value) = env("SKILLPACK_SIGNING_SECRET") {
            self.storage.signing_secret = value;
        }
        if let Some(value) = env("SKILLPACK_PUBLIC_BASE_URL") {
            self.storage.public_base_url = value;
        }
        if let Some(value) = env("SKILLPACK_URL_TTL_SECS") {
            self.storage.default_url_ttl_secs = value.parse::<u64>().map_err(|err| {
                SkillError::Config(format!("invalid SKILLPACK_URL_TTL_SECS value {value}: {err}"))
            })?;
        }
        if let Some(value) = env("SKILLPACK_PERSONAL_SCOPE") {
            self.packages.personal_scope = value;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding the `fs` backend's objects.
    pub root: PathBuf,
    /// Secret for signed URLs. `url` refuses to run while this is empty.
    #[serde(default)]
    pub signing_secret: String,
    pub public_base_url: String,
    pub default_url_ttl_secs: u64,
}

impl StorageConfig {
    #[must_use]
    pub fn for_root(root: &Path) -> Self {
        Self {
            backend: StorageBackend::Fs,
            root: root.join("store"),
            signing_secret: String::new(),
            public_base_url: "http://127.0.0.1:8080/files".to_string(),
            default_url_ttl_secs: DEFAULT_URL_TTL_SECS,
        }
    }

    fn merge(&mut self, patch: StoragePatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.root {
            self.root = value;
        }
        if let Some(value) = patch.signing_secret {
            self.signing_secret = value;
        }
        if let Some(value) = patch.public_base_url {
            self.public_base_url = value;
        }
        if let Some(value) = patch.default_url_ttl_secs {
            self.default_url_ttl_secs = value;
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::for_root(Path::new(".skillpack"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackagesConfig {
    /// Scope segment used when a skill has no team.
    pub personal_scope: String,
    /// Slug prefix of provisional import locations.
    pub staging_prefix: String,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            personal_scope: "_personal".to_string(),
            staging_prefix: "import".to_string(),
        }
    }
}

impl PackagesConfig {
    fn merge(&mut self, patch: PackagesPatch) {
        if let Some(value) = patch.personal_scope {
            self.personal_scope = value;
        }
        if let Some(value) = patch.staging_prefix {
            self.staging_prefix = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub storage: Option<StoragePatch>,
    pub packages: Option<PackagesPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StoragePatch {
    pub backend: Option<StorageBackend>,
    pub root: Option<PathBuf>,
    pub signing_secret: Option<String>,
    pub public_base_url: Option<String>,
    pub default_url_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PackagesPatch {
    pub personal_scope: Option<String>,
    pub staging_prefix: Option<String>,
}

fn parse_backend(value: &str) -> Result<StorageBackend> {
    match value.to_lowercase().as_str() {
        "fs" | "file" | "filesystem" => Ok(StorageBackend::Fs),
        "memory" | "mem" => Ok(StorageBackend::Memory),
        _ => Err(SkillError::Config(format!(
            "invalid storage backend {value} (expected fs|memory)"
        ))),
    }
}
