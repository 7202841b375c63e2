//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` in the working directory,
//! then from `ARQUEO__<SECTION>__<KEY>` environment variables
//! (e.g. `ARQUEO__SERVER__PORT=9000`).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    /// Tracing level for the workspace crates.
    pub level: String,
    /// Córdobas per US dollar, as a decimal string. Defaults to 36.5.
    pub exchange_rate: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            exchange_rate: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    /// Allow browser clients from any origin.
    pub cors: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: 8001,
            database: Database::Sqlite("arqueo.db".to_string()),
            cors: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("ARQUEO").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
