//! Configuration management for the revox CLI and library
//!
//! Values are layered: built-in defaults, then the JSON config file, then
//! `REVOX_*` environment variables.

use config::{Config as ConfigLoader, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::commands::ConfigCommand;
use crate::error::{Result, RevoxError};
use crate::ui::UI;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PAGE_SIZE: usize = 5;
pub const DEFAULT_QUERY_RETRY: u32 = 1;
pub const DEFAULT_STALE_TIME_SECS: u64 = 5 * 60;
pub const DEFAULT_CATEGORY_STALE_TIME_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub timeout: u64,
    pub verbose: bool,
    pub storage_dir: PathBuf,
    #[serde(default)]
    pub google_client_id: Option<String>,
    pub page_size: usize,
    pub query_retry: u32,
    pub stale_time_secs: u64,
    pub category_stale_time_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            verbose: false,
            storage_dir: default_storage_dir(),
            google_client_id: None,
            page_size: DEFAULT_PAGE_SIZE,
            query_retry: DEFAULT_QUERY_RETRY,
            stale_time_secs: DEFAULT_STALE_TIME_SECS,
            category_stale_time_secs: DEFAULT_CATEGORY_STALE_TIME_SECS,
        }
    }
}

impl Config {
    /// Load from the default config path
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_path())
    }

    /// Load from `config_path`, falling back to defaults for missing keys
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = ConfigLoader::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("timeout", defaults.timeout)?
            .set_default("verbose", defaults.verbose)?
            .set_default(
                "storage_dir",
                defaults.storage_dir.to_string_lossy().to_string(),
            )?
            .set_default("page_size", defaults.page_size as u64)?
            .set_default("query_retry", defaults.query_retry as u64)?
            .set_default("stale_time_secs", defaults.stale_time_secs)?
            .set_default(
                "category_stale_time_secs",
                defaults.category_stale_time_secs,
            )?;

        if config_path.exists() {
            builder = builder.add_source(File::from(config_path));
        }
        builder = builder.add_source(Environment::with_prefix("REVOX").try_parsing(true));

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(RevoxError::invalid_endpoint("API base URL cannot be empty"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(RevoxError::invalid_endpoint(format!(
                "API base URL must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }
        if self.timeout == 0 {
            return Err(RevoxError::config("Timeout must be at least one second"));
        }
        if self.page_size == 0 {
            return Err(RevoxError::config("Page size must be at least 1"));
        }
        Ok(())
    }

    /// Join `endpoint` onto the API base URL
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), endpoint)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs)
    }

    pub fn category_stale_time(&self) -> Duration {
        Duration::from_secs(self.category_stale_time_secs)
    }

    /// File holding the persisted session
    pub fn session_file(&self) -> PathBuf {
        self.storage_dir.join("session.json")
    }
}

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("revox")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("revox")
}

/// Handles `revox config ...`
pub struct ConfigService {
    config: Config,
    config_path: PathBuf,
    ui: UI,
}

impl ConfigService {
    pub fn new(config: Config) -> Self {
        Self::with_config_path(config, default_config_path())
    }

    pub fn with_config_path(config: Config, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            ui: UI::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn handle_config(&mut self, command: ConfigCommand) -> Result<()> {
        match command {
            ConfigCommand::Show => {
                self.show();
                Ok(())
            }
            ConfigCommand::SetEndpoint { url } => self.set_endpoint(url).await,
            ConfigCommand::SetTimeout { seconds } => self.set_timeout(seconds).await,
            ConfigCommand::SetPageSize { size } => self.set_page_size(size).await,
            ConfigCommand::Reset => self.reset().await,
        }
    }

    pub fn show(&self) {
        let config = &self.config;
        self.ui.card(
            "Configuration",
            vec![
                ("API base URL", config.api_base_url.clone()),
                ("Timeout", format!("{}s", config.timeout)),
                ("Page size", config.page_size.to_string()),
                ("Storage", config.storage_dir.display().to_string()),
                (
                    "Google client ID",
                    config
                        .google_client_id
                        .clone()
                        .unwrap_or_else(|| "-".to_string()),
                ),
                ("Config file", self.config_path.display().to_string()),
            ],
        );
    }

    pub async fn set_endpoint(&mut self, url: String) -> Result<()> {
        let mut updated = self.config.clone();
        updated.api_base_url = url.trim_end_matches('/').to_string();
        self.commit(updated).await?;
        self.ui
            .success(&format!("API base URL set to {}", self.config.api_base_url));
        Ok(())
    }

    pub async fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        let mut updated = self.config.clone();
        updated.timeout = seconds;
        self.commit(updated).await?;
        self.ui
            .success(&format!("Request timeout set to {}s", seconds));
        Ok(())
    }

    pub async fn set_page_size(&mut self, size: usize) -> Result<()> {
        let mut updated = self.config.clone();
        updated.page_size = size;
        self.commit(updated).await?;
        self.ui.success(&format!("Page size set to {}", size));
        Ok(())
    }

    pub async fn reset(&mut self) -> Result<()> {
        self.commit(Config::default()).await?;
        self.ui.success("Configuration reset to defaults");
        Ok(())
    }

    async fn commit(&mut self, updated: Config) -> Result<()> {
        updated.validate()?;
        updated.save(&self.config_path).await?;
        self.config = updated;
        Ok(())
    }
}
