//! Chart generation models

use chrono::{DateTime, Utc};

/// A single data point on a price chart
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Difference between each price and the one before it, stamped with the
/// time of the later sample.
pub fn price_changes(points: &[PricePoint]) -> Vec<PricePoint> {
    points
        .windows(2)
        .map(|pair| PricePoint {
            timestamp: pair[1].timestamp,
            price: pair[1].price - pair[0].price,
        })
        .collect()
}
