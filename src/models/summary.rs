//! Aggregate statistics models

use std::fmt;

/// The four statistics printed at the end of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSummary {
    pub average_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_price: Option<f64>,
    pub price_change: Option<f64>,
}

fn stat(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "None".to_string(),
    }
}

impl fmt::Display for PriceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Average Price: {}", stat(self.average_price))?;
        writeln!(f, "Maximum Price: {}", stat(self.max_price))?;
        writeln!(f, "Minimum Price: {}", stat(self.min_price))?;
        write!(f, "Price Change: {}", stat(self.price_change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines() {
        let summary = PriceSummary {
            average_price: Some(100.5),
            max_price: Some(110.0),
            min_price: Some(90.0),
            price_change: None,
        };

        let rendered = summary.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Average Price: 100.5",
                "Maximum Price: 110",
                "Minimum Price: 90",
                "Price Change: None",
            ]
        );
    }
}
