use std::path::PathBuf;

use thiserror::Error;

use crate::api::coingecko::CoinGeckoClient;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: i64,
    pub cache_key: String,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Config {
            api_url: var("PRICE_API_URL", CoinGeckoClient::DEFAULT_URL),
            redis_host: var("REDIS_HOST", "localhost"),
            redis_port: parse_number("REDIS_PORT", var("REDIS_PORT", "6379"))?,
            redis_db: parse_number("REDIS_DB", var("REDIS_DB", "0"))?,
            cache_key: var("CACHE_KEY", "bitcoin_data"),
            output_dir: PathBuf::from(var("CHART_OUTPUT_DIR", ".")),
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { name, value })
}
