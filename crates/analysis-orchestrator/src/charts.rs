use analysis_core::{DividendData, PriceHistory};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Data for one chart; drawing it is left to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lowest and highest value, ignoring non-finite points.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

pub fn price_chart(history: &PriceHistory) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        label: "Price ($)".to_string(),
        labels: history.dates.clone(),
        values: history.prices.clone(),
    }
}

/// `None` when there is no dividend history to show.
pub fn dividend_chart(dividends: &DividendData) -> Option<ChartSpec> {
    let history = dividends.non_empty_history()?;
    Some(ChartSpec {
        kind: ChartKind::Bar,
        label: "Annual dividend ($)".to_string(),
        labels: history.years.iter().map(|y| y.to_string()).collect(),
        values: history.amounts.clone(),
    })
}
