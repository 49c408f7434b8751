use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use super::chart::PricePoint;

/// JSON object as returned by the API and stored in the cache
pub type Document = Map<String, Value>;

/// Key under which the price series is nested
pub const PRICES_KEY: &str = "prices";

/// Reasons a document cannot be read as a price series
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("document has no `prices` key")]
    MissingPrices,
    #[error("`prices` is not a list")]
    NotAList,
    #[error("malformed price entry at index {index}")]
    MalformedEntry { index: usize },
}

/// The sentinel returned by the fetcher and cache when they fail
pub fn empty_document() -> Document {
    Map::new()
}

/// Basic shape check: the document carries a `prices` key
pub fn validate_data(document: &Document) -> bool {
    document.contains_key(PRICES_KEY)
}

/// Read the `prices` list as `[timestamp_millis, price]` pairs
pub fn price_series(document: &Document) -> Result<Vec<PricePoint>, DataError> {
    let prices = document.get(PRICES_KEY).ok_or(DataError::MissingPrices)?;
    let entries = prices.as_array().ok_or(DataError::NotAList)?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(entry).ok_or(DataError::MalformedEntry { index }))
        .collect()
}

fn parse_entry(entry: &Value) -> Option<PricePoint> {
    let pair = entry.as_array()?;
    if pair.len() != 2 {
        return None;
    }

    // Some sources emit the timestamp as a float (e.g. 1700000000000.0)
    let millis = match pair[0].as_i64() {
        Some(ms) => ms,
        None => {
            let ms = pair[0].as_f64()?;
            if ms.fract() != 0.0 {
                return None;
            }
            ms as i64
        }
    };

    Some(PricePoint {
        timestamp: DateTime::<Utc>::from_timestamp_millis(millis)?,
        price: pair[1].as_f64()?,
    })
}
