use std::fmt::Formatter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;

use crate::data::import::source::{ImportSource, DEFAULT_CSV_ENTRY, DEFAULT_POSTCODES_URL};
use crate::data::import::ColumnLayout;

const DEFAULT_DB_POOL_SIZE: u32 = 15;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 600;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{} must be set", name),
            ConfigError::Invalid { name, value } => write!(f, "{} has an invalid value: {:?}", name, value)
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub pool_size: u32,
    pub bind_address: String,
    pub import: ImportSettings
}

#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub source: ImportSource,
    /// Picks the CSV entry out of the archive
    pub csv_entry: Regex,
    /// Clear the table before loading
    pub truncate: bool,
    pub layout: ColumnLayout,
    pub download_timeout: Duration
}

impl Settings {
    pub fn from_env() -> Result<Settings, ConfigError> {
        dotenv::dotenv().ok();
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Settings, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = env.get("DATABASE_URL")
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let source = match env.get("POSTCODES_FILE") {
            Some(path) => ImportSource::File(PathBuf::from(path)),
            None => ImportSource::Url(
                env.get("POSTCODES_URL").unwrap_or_else(|| DEFAULT_POSTCODES_URL.to_owned())
            )
        };

        let csv_entry = env.get("POSTCODES_CSV_ENTRY")
            .unwrap_or_else(|| DEFAULT_CSV_ENTRY.to_owned());
        let csv_entry = Regex::new(&csv_entry)
            .map_err(|_| ConfigError::Invalid { name: "POSTCODES_CSV_ENTRY", value: csv_entry.clone() })?;

        let defaults = ColumnLayout::default();
        let layout = ColumnLayout {
            postcode: env.parse("IMPORT_POSTCODE_COLUMN", defaults.postcode)?,
            latitude: env.parse("IMPORT_LATITUDE_COLUMN", defaults.latitude)?,
            longitude: env.parse("IMPORT_LONGITUDE_COLUMN", defaults.longitude)?
        };

        Ok(Settings {
            database_url,
            pool_size: env.parse("DATABASE_POOL_SIZE", DEFAULT_DB_POOL_SIZE)?,
            bind_address: env.get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
            import: ImportSettings {
                source,
                csv_entry,
                truncate: env.flag("IMPORT_TRUNCATE", true)?,
                layout,
                download_timeout: Duration::from_secs(
                    env.parse("IMPORT_DOWNLOAD_TIMEOUT_SECS", DEFAULT_DOWNLOAD_TIMEOUT_SECS)?
                )
            }
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Unset and blank are the same thing.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn parse<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => value
                .trim()
                .parse::<T>()
                .map_err(|_| ConfigError::Invalid { name: key, value }),
            None => Ok(default)
        }
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::Invalid { name: key, value })
            },
            None => Ok(default)
        }
    }
}
