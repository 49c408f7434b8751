use tracing::warn;

use crate::models::{price_series, DataError, Document, PriceSummary};

/// Prices of the series, or None when the document has no usable series
fn prices(document: &Document) -> Option<Vec<f64>> {
    match price_series(document) {
        Ok(points) => Some(points.into_iter().map(|p| p.price).collect()),
        Err(DataError::MissingPrices) => None,
        Err(e) => {
            warn!("Ignoring price data for aggregation: {}", e);
            None
        }
    }
}

/// Arithmetic mean of all prices
pub fn calculate_average_price(document: &Document) -> Option<f64> {
    let prices = prices(document)?;
    if prices.is_empty() {
        return None;
    }
    Some(prices.iter().sum::<f64>() / prices.len() as f64)
}

/// Highest price in the series
pub fn find_max_price(document: &Document) -> Option<f64> {
    prices(document)?.into_iter().reduce(f64::max)
}

/// Lowest price in the series
pub fn find_min_price(document: &Document) -> Option<f64> {
    prices(document)?.into_iter().reduce(f64::min)
}

/// Last price minus first price. Needs at least two samples.
pub fn calculate_price_change(document: &Document) -> Option<f64> {
    let prices = prices(document)?;
    if prices.len() < 2 {
        return None;
    }
    Some(prices[prices.len() - 1] - prices[0])
}

pub fn summarize(document: &Document) -> PriceSummary {
    PriceSummary {
        average_price: calculate_average_price(document),
        max_price: find_max_price(document),
        min_price: find_min_price(document),
        price_change: calculate_price_change(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::empty_document;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_series_has_no_values() {
        let document = doc(json!({"prices": []}));

        assert_eq!(summarize(&document), PriceSummary::default());
    }

    #[test]
    fn test_missing_prices_has_no_values() {
        assert_eq!(summarize(&empty_document()), PriceSummary::default());
        assert_eq!(
            summarize(&doc(json!({"total_volumes": [[0, 1]]}))),
            PriceSummary::default()
        );
    }

    #[test]
    fn test_single_sample() {
        let document = doc(json!({"prices": [[0, 42.5]]}));

        assert_eq!(calculate_average_price(&document), Some(42.5));
        assert_eq!(find_max_price(&document), Some(42.5));
        assert_eq!(find_min_price(&document), Some(42.5));
        assert_eq!(calculate_price_change(&document), None);
    }

    #[test]
    fn test_three_samples() {
        let document = doc(json!({"prices": [[0, 100], [1000, 110], [2000, 90]]}));

        let summary = summarize(&document);

        assert_eq!(summary.average_price, Some(100.0));
        assert_eq!(summary.max_price, Some(110.0));
        assert_eq!(summary.min_price, Some(90.0));
        assert_eq!(summary.price_change, Some(-10.0));
    }

    #[test]
    fn test_price_change_is_last_minus_first() {
        // 80 and 130 are the extrema but neither is an endpoint
        let document = doc(json!({"prices": [[0, 100], [1, 130], [2, 80], [3, 105]]}));

        assert_eq!(calculate_price_change(&document), Some(5.0));
    }

    #[test]
    fn test_malformed_series_has_no_values() {
        let document = doc(json!({"prices": [[0, 100], "oops"]}));

        assert_eq!(summarize(&document), PriceSummary::default());
    }
}
