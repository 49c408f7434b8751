use std::path::Path;

use reqwest::Method;
use tracing::{info, warn};

use crate::api::PriceSource;
use crate::db::DocumentStore;
use crate::models::PriceSummary;
use crate::services::{aggregate_service, chart_service};

/// How a run ended when nothing fatal happened
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Charts written and statistics printed
    Reported(PriceSummary),
    /// The API returned nothing; cache and charts were not touched
    FetchFailed,
    /// The cache read-back was empty; charts were not rendered
    CacheReadFailed,
}

/// Fetch → cache write → cache read → charts → statistics.
///
/// Only an invalid document reaching the line chart (or a rendering failure)
/// is returned as an error; everything else degrades to a printed message.
pub async fn run<P, S>(
    source: &P,
    store: &mut S,
    cache_key: &str,
    out_dir: &Path,
) -> Result<RunOutcome, chart_service::ChartError>
where
    P: PriceSource,
    S: DocumentStore,
{
    info!("Fetching price data...");
    let data = source.fetch(Method::GET).await;
    if data.is_empty() {
        println!("Failed to fetch data from API.");
        warn!("Fetch returned no data");
        return Ok(RunOutcome::FetchFailed);
    }

    info!("Caching price data under '{}'", cache_key);
    store.set(cache_key, &data).await;

    let stored_data = store.get(cache_key).await;
    if stored_data.is_empty() {
        println!("Failed to retrieve data from Redis.");
        warn!("Cache read-back for '{}' was empty", cache_key);
        return Ok(RunOutcome::CacheReadFailed);
    }

    info!("Rendering charts to {}", out_dir.display());
    chart_service::plot_line_chart(&stored_data, out_dir)?;
    chart_service::plot_histogram(&stored_data, out_dir)?;
    chart_service::plot_scatter(&stored_data, out_dir)?;

    let summary = aggregate_service::summarize(&stored_data);
    println!("{}", summary);

    Ok(RunOutcome::Reported(summary))
}
