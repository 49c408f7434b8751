pub mod coingecko;

use reqwest::Method;

use crate::models::Document;

/// Anything that can produce the market-data document for a run.
///
/// Implementations never fail: errors are reported where they happen and an
/// empty document is returned instead.
#[allow(async_fn_in_trait)]
pub trait PriceSource {
    async fn fetch(&self, method: Method) -> Document;
}
