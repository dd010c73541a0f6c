use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Runtime settings for a dispatch run.
///
/// Every field has a default, so a bare working directory holding
/// `email-config.json`, `email-data.json` and `email.tmpl` needs no settings at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the three input resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_sender_config")]
    pub sender_config: PathBuf,
    #[serde(default = "default_recipients")]
    pub recipients: PathBuf,
    #[serde(default = "default_template")]
    pub template: PathBuf,
}

fn default_sender_config() -> PathBuf {
    PathBuf::from("email-config.json")
}

fn default_recipients() -> PathBuf {
    PathBuf::from("email-data.json")
}

fn default_template() -> PathBuf {
    PathBuf::from("email.tmpl")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sender_config: default_sender_config(),
            recipients: default_recipients(),
            template: default_template(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            file_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::builder()
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// `MAILSHOT__PATHS__TEMPLATE=...` sets `paths.template`.
    fn environment() -> Environment {
        Environment::with_prefix("MAILSHOT").separator("__")
    }

    fn builder() -> config::ConfigBuilder<config::builder::DefaultState> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
    }
}
