//! Settings of the `tallybook` binary.
//!
//! Read from an optional `tallybook.toml` (or the file given with
//! `--config`), then overridden by `TALLYBOOK__*` environment variables,
//! e.g. `TALLYBOOK__APP__LEVEL=debug`.
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use engine::LedgerSettings;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `database = "memory"` or `database.sqlite = "path/to/file.db"`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("./tallybook.db".to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub ledger: LedgerSettings,
}

impl Settings {
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("tallybook").required(false),
        };
        Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("TALLYBOOK").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}
