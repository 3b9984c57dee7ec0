use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Default refresh interval: four hours.
const DEFAULT_CACHE_TTL_SECS: u64 = 14_400;
const DEFAULT_CSV_PATH: &str = "data/market_pnl.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub pnl_source: PnlSource,
    pub cache_ttl: Duration,
}

/// Where each refresh gets its table from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PnlSource {
    /// Aggregate raw events from the SQLite database at `path`.
    Database { path: String },
    /// Load a previously exported PnL CSV.
    Csv { path: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let pnl_source = match env_map
            .get("PNL_SOURCE")
            .map(|s| s.as_str())
            .unwrap_or("database")
        {
            "database" => PnlSource::Database {
                path: env_map
                    .get("DATABASE_PATH")
                    .cloned()
                    .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?,
            },
            "csv" => PnlSource::Csv {
                path: env_map
                    .get("PNL_CSV_PATH")
                    .cloned()
                    .unwrap_or_else(|| DEFAULT_CSV_PATH.to_string()),
            },
            other => {
                return Err(ConfigError::InvalidValue(
                    "PNL_SOURCE".to_string(),
                    format!("must be database or csv, got {}", other),
                ))
            }
        };

        let cache_ttl_secs = match env_map.get("CACHE_TTL_SECS") {
            Some(s) => s.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "CACHE_TTL_SECS".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        Ok(Config {
            port,
            pnl_source,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        })
    }
}
