//! Layered client configuration.
//!
//! Priority, lowest first: built-in defaults, config file (`--config` /
//! `CONFIG_FILE`, else `./docchat.{yaml,toml,json}` when present),
//! `DOCCHAT_`-prefixed environment variables (`DOCCHAT_BACKEND__BASE_URL`),
//! then CLI flags and their env aliases.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::chat::RevealSchedule;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Backend base URL
    #[arg(long, env = "API_BASE_URL")]
    pub backend_url: Option<String>,

    /// File holding the persisted session id
    #[arg(long, env = "STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Show replies at once instead of word by word
    #[arg(long)]
    pub no_animation: bool,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub reveal: RevealSchedule,
    pub notifications: NotificationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    pub ttl_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub json: bool,
    pub level: String,
}

impl StorageConfig {
    /// Where the session id lives: the configured path, else the platform
    /// data directory, else the working directory.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| {
            dirs::data_local_dir().map_or_else(
                || PathBuf::from(".docchat-state.json"),
                |dir| dir.join("docchat").join("state.json"),
            )
        })
    }
}

impl NotificationConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        let reveal = RevealSchedule::default();
        builder = builder
            .set_default("backend.base_url", DEFAULT_BASE_URL)?
            .set_default("reveal.floor_ms", reveal.floor_ms)?
            .set_default("reveal.base_ms", reveal.base_ms)?
            .set_default("reveal.divisor", reveal.divisor)?
            .set_default("notifications.ttl_ms", 4000)?
            .set_default("logging.json", false)?
            .set_default("logging.level", "info")?;

        // 2. Config file
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name("docchat").required(false)),
        };

        // 3. Environment, e.g. DOCCHAT_BACKEND__BASE_URL=http://10.0.0.2:8000
        builder = builder.add_source(
            Environment::with_prefix("DOCCHAT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (clap already folded in their env aliases)
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(path) = cli.state_file {
            builder = builder.set_override("storage.path", path.to_string_lossy().into_owned())?;
        }
        if cli.no_animation {
            let instant = RevealSchedule::instant();
            builder = builder
                .set_override("reveal.floor_ms", instant.floor_ms)?
                .set_override("reveal.base_ms", instant.base_ms)?
                .set_override("reveal.divisor", instant.divisor)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}
