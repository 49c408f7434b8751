//! Data models shared by the fetcher, cache, renderer and aggregator
//!
//! A [`Document`] is the raw JSON object returned by the market-data API and
//! stored verbatim in the cache. Everything downstream reads the `prices`
//! series out of it through [`price_series`].

pub mod chart;
pub mod document;
pub mod summary;

pub use chart::PricePoint;
pub use document::{empty_document, price_series, validate_data, DataError, Document};
pub use summary::PriceSummary;
