//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `EXTERNALS__SECTION__KEY`, e.g.
//!    `EXTERNALS__GENERATOR__LENGTH=12`
//! 3. Config file (`--config`, else [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const ENV_PREFIX: &str = "EXTERNALS";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// What `generate` issues when no flag says otherwise.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Where issued codes are remembered.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Message catalog overlay.
    #[serde(default)]
    pub translations: TranslationConfig,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub entity: String,
    pub property: String,
    pub length: usize,
    pub check_digit: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            entity: "code".into(),
            property: "value".into(),
            length: 10,
            check_digit: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry file; `None` uses the platform data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// TOML catalog with a `[messages]` table.
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Default `generate` format: table, list or json.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "table".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the file, then the environment.
    ///
    /// `config_file` is the path the user passed via `--config`, or `None` to
    /// use [`Self::config_path`].  A missing file is not an error.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let path = config_file.cloned().unwrap_or_else(Self::config_path);

        if config_file.is_some() && !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
        }

        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default config")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read config from '{}'", path.display()))?;

        let loaded: Self = config
            .try_deserialize()
            .context("Invalid configuration values")?;

        debug!(path = %path.display(), "Configuration loaded");
        Ok(loaded)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.externals.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".externals.toml"))
    }

    /// Registry file in effect: configured path or the platform data dir.
    pub fn registry_path(&self) -> PathBuf {
        self.registry.path.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|d| d.data_dir().join("codes.jsonl"))
                .unwrap_or_else(|| PathBuf::from(".externals-codes.jsonl"))
        })
    }

    /// File `init` writes to and `config path` reports.
    pub fn active_path(config_file: Option<&Path>) -> PathBuf {
        config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path)
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "externals", "externals")
}
