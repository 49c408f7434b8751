use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod db;
mod models;
mod services;

use api::coingecko::CoinGeckoClient;
use config::Config;
use db::RedisJsonStore;
use services::report_service;

const DEFAULT_LOG_DIRECTIVE: &str = "btc_price_report=info";

/// `RUST_LOG` when it is set and parses, this crate at info otherwise
fn log_filter(rust_log: Option<String>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting btc-price-report");

    let source = CoinGeckoClient::new(reqwest::Client::new(), config.api_url.clone());
    info!("Market data endpoint: {}", source.url());

    let mut store = match RedisJsonStore::new(&config.redis_host, config.redis_port, config.redis_db) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create Redis client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match report_service::run(&source, &mut store, &config.cache_key, &config.output_dir).await {
        Ok(outcome) => {
            info!("Run finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
