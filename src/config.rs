use crate::cli::OutputFormat;
use crate::error::ClientError;
use anyhow::Result;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Build-time default injected via build.rs
const DEFAULT_API_URL: &str = env!("PETFRIENDS_API_URL");

/// Environment variable that overrides the configured API URL.
pub const API_URL_ENV: &str = "PETFRIENDS_API_URL";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Account used by `petfriends key` and the live scenario suite.
    pub email: Option<String>,
    pub password: Option<String>,

    #[serde(default = "default_format")]
    pub format: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_format() -> String {
    "table".to_string()
}

impl Config {
    pub fn load() -> Result<Self, ClientError> {
        Self::load_from_path(&Self::path()?)
    }

    /// Load config from a specific path. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self, ClientError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(ClientError::ConfigRead)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn path() -> Result<PathBuf, ClientError> {
        let dirs = ProjectDirs::from("ru", "skillfactory", "petfriends").ok_or_else(|| {
            ClientError::Other("Could not determine config directory".to_string())
        })?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            email: None,
            password: None,
            format: default_format(),
        }
    }
}

/// Runtime context: config file plus environment and CLI overrides.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    api_url_override: Option<String>,
    format_override: Option<OutputFormat>,
}

impl Context {
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        Ok(Self::with_config(config))
    }

    /// Create context with a specific config (for testing)
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            api_url_override: None,
            format_override: None,
        }
    }

    pub fn override_api_url(&mut self, url: String) {
        self.api_url_override = Some(url);
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format_override = Some(format);
    }

    /// CLI flag, then `PETFRIENDS_API_URL`, then the config file.
    pub fn api_url(&self) -> String {
        if let Some(url) = &self.api_url_override {
            return url.clone();
        }
        std::env::var(API_URL_ENV).unwrap_or_else(|_| self.config.api_url.clone())
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format_override
            .unwrap_or_else(|| match self.config.format.to_lowercase().as_str() {
                "json" => OutputFormat::Json,
                "yaml" => OutputFormat::Yaml,
                "table" => OutputFormat::Table,
                other => {
                    tracing::warn!(format = other, "unknown output format in config, using table");
                    OutputFormat::Table
                }
            })
    }
}
