//! Runtime configuration, read from an optional `cellarium` config file and
//! `CELLARIUM_`-prefixed environment variables (e.g.
//! `CELLARIUM_SERVER__PORT=8080`).

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{CellariumError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// Path to the exported row set (JSON array of arrays of cells).
    #[serde(default = "default_rows_path")]
    pub rows_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_rows_path() -> String {
    String::from("wines.json")
}

fn default_address() -> String {
    String::from("127.0.0.1")
}

fn default_port() -> u16 {
    3001
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            rows_path: default_rows_path(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name("cellarium").required(false))
            .add_source(Environment::with_prefix("CELLARIUM").separator("__"))
            .build()
            .map_err(|e| CellariumError::Config(e.to_string()))?;
        config
            .try_deserialize()
            .map_err(|e| CellariumError::Config(e.to_string()))
    }
}
