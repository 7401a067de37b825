//! Configuration management for Chronicle

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Maximum accepted message length, enforced at the API boundary.
    /// The ledger core itself only rejects empty messages.
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_message_len: default_max_message_len(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_message_len() -> usize {
    250
}

/// Load configuration from the given TOML file, falling back to defaults
/// when the file is absent.
pub fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = fs::read_to_string(path).unwrap_or_default();
    let config: Config = if config_str.is_empty() {
        Config {
            server: ServerConfig::default(),
            ledger: LedgerConfig::default(),
        }
    } else {
        toml::from_str(&config_str)?
    };

    // Validate critical values
    if config.server.bind.is_empty() {
        return Err("server.bind must be set in config.toml".into());
    }

    if config.ledger.max_message_len == 0 {
        return Err("ledger.max_message_len must be at least 1".into());
    }

    Ok(config)
}
