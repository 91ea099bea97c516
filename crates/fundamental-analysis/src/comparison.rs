//! Side-by-side comparison of two companies: strength lists, summary text and
//! the metric table.

use std::fmt;

use analysis_core::{Metric, MetricsRecord};
use serde::Serialize;

use crate::format::{format_fixed, format_percentage, or_na, round_to};

pub const DISCLAIMER: &str = "This commentary is generated automatically for information \
purposes only and does not constitute investment advice.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Better {
    Higher,
    Lower,
}

impl Better {
    /// Strict winner between `a` and `b`; a tie has none.
    pub fn winner(&self, a: f64, b: f64) -> Option<Side> {
        let (a_wins, b_wins) = match self {
            Better::Higher => (a > b, b > a),
            Better::Lower => (a < b, b < a),
        };
        match (a_wins, b_wins) {
            (true, _) => Some(Side::First),
            (_, true) => Some(Side::Second),
            _ => None,
        }
    }
}

/// A metric on which one company outperforms the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    AttractiveValuation,
    BetterProfitability,
    HigherMargins,
    ControlledDebt,
}

impl Strength {
    pub fn phrase(&self) -> &'static str {
        match self {
            Strength::AttractiveValuation => "a more attractive valuation (lower P/E)",
            Strength::BetterProfitability => "better profitability (ROE)",
            Strength::HigherMargins => "higher margins",
            Strength::ControlledDebt => "better-controlled debt",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparedMetric {
    pub metric: Metric,
    pub better: Better,
    pub strength: Strength,
}

/// Metrics consulted by the comparison summary, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonConfig {
    pub metrics: Vec<ComparedMetric>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            metrics: vec![
                ComparedMetric {
                    metric: Metric::PeRatio,
                    better: Better::Lower,
                    strength: Strength::AttractiveValuation,
                },
                ComparedMetric {
                    metric: Metric::Roe,
                    better: Better::Higher,
                    strength: Strength::BetterProfitability,
                },
                ComparedMetric {
                    metric: Metric::NetMargin,
                    better: Better::Higher,
                    strength: Strength::HigherMargins,
                },
                ComparedMetric {
                    metric: Metric::DebtToEquity,
                    better: Better::Lower,
                    strength: Strength::ControlledDebt,
                },
            ],
        }
    }
}

impl ComparisonConfig {
    /// Valuation and profitability only.
    pub fn valuation_and_profitability() -> Self {
        let mut config = Self::default();
        config.metrics.truncate(2);
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOutcome {
    FirstMoreRobust,
    SecondMoreAttractive,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub subject_a: String,
    pub subject_b: String,
    pub strengths_a: Vec<Strength>,
    pub strengths_b: Vec<Strength>,
}

impl ComparisonSummary {
    pub fn outcome(&self) -> ComparisonOutcome {
        use std::cmp::Ordering;
        match self.strengths_a.len().cmp(&self.strengths_b.len()) {
            Ordering::Greater => ComparisonOutcome::FirstMoreRobust,
            Ordering::Less => ComparisonOutcome::SecondMoreAttractive,
            Ordering::Equal => ComparisonOutcome::Balanced,
        }
    }

    pub fn conclusion(&self) -> String {
        match self.outcome() {
            ComparisonOutcome::FirstMoreRobust => {
                format!("{} appears more robust overall.", self.subject_a)
            }
            ComparisonOutcome::SecondMoreAttractive => {
                format!("{} appears more attractive overall.", self.subject_b)
            }
            ComparisonOutcome::Balanced => "Both companies are competitive; the choice depends \
                on the investor's priorities."
                .to_string(),
        }
    }
}

fn join_phrases(strengths: &[Strength]) -> String {
    strengths.iter().map(Strength::phrase).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Comparing {} and {}, several points stand out.",
            self.subject_a, self.subject_b
        )?;
        if !self.strengths_a.is_empty() {
            write!(f, " {} stands out with {}.", self.subject_a, join_phrases(&self.strengths_a))?;
        }
        if !self.strengths_b.is_empty() {
            write!(
                f,
                " Conversely, {} shows its strength with {}.",
                self.subject_b,
                join_phrases(&self.strengths_b)
            )?;
        }
        write!(f, " Conclusion: {} {}", self.conclusion(), DISCLAIMER)
    }
}

pub fn compare_strengths(
    a: &MetricsRecord,
    b: &MetricsRecord,
    config: &ComparisonConfig,
) -> ComparisonSummary {
    let mut strengths_a = Vec::new();
    let mut strengths_b = Vec::new();

    // The API reports missing figures as 0, so zero is never comparable.
    let comparable =
        |record: &MetricsRecord, metric: Metric| record.value(metric).filter(|v| *v != 0.0);

    for compared in &config.metrics {
        let (Some(va), Some(vb)) = (comparable(a, compared.metric), comparable(b, compared.metric))
        else {
            continue;
        };
        match compared.better.winner(va, vb) {
            Some(Side::First) => strengths_a.push(compared.strength),
            Some(Side::Second) => strengths_b.push(compared.strength),
            None => {}
        }
    }

    ComparisonSummary {
        subject_a: a.display_name().to_string(),
        subject_b: b.display_name().to_string(),
        strengths_a,
        strengths_b,
    }
}

/// Summary over the four default metrics.
pub fn generate_comparison_summary(a: &MetricsRecord, b: &MetricsRecord) -> ComparisonSummary {
    compare_strengths(a, b, &ComparisonConfig::default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Fixed(u32),
    Percent,
}

impl Precision {
    fn render(&self, value: Option<f64>) -> String {
        match self {
            Precision::Fixed(decimals) => or_na(value, |v| format_fixed(v, *decimals)),
            Precision::Percent => or_na(value, format_percentage),
        }
    }

    /// Value at the precision it is shown with.
    fn shown(&self, value: f64) -> f64 {
        match self {
            Precision::Fixed(decimals) => round_to(value, *decimals),
            Precision::Percent => round_to(value * 100.0, 1),
        }
    }
}

const TABLE_ROWS: [(Metric, &str, Better, Precision); 5] = [
    (Metric::PeRatio, "P/E", Better::Lower, Precision::Fixed(1)),
    (Metric::Roe, "ROE", Better::Higher, Precision::Percent),
    (Metric::NetMargin, "Net margin", Better::Higher, Precision::Percent),
    (Metric::DebtToEquity, "Debt/Equity", Better::Lower, Precision::Fixed(2)),
    (Metric::DividendYield, "Dividend yield", Better::Higher, Precision::Percent),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: &'static str,
    pub value_a: String,
    pub value_b: String,
    pub winner: Option<Side>,
}

/// Metric table for two companies. Winners are decided on the values as
/// displayed, so figures equal at display precision are a tie.
pub fn comparison_table(a: &MetricsRecord, b: &MetricsRecord) -> Vec<ComparisonRow> {
    TABLE_ROWS
        .iter()
        .map(|&(metric, label, better, precision)| {
            let va = a.value(metric);
            let vb = b.value(metric);
            let winner = match (va, vb) {
                (Some(x), Some(y)) => better.winner(precision.shown(x), precision.shown(y)),
                _ => None,
            };
            ComparisonRow {
                label,
                value_a: precision.render(va),
                value_b: precision.render(vb),
                winner,
            }
        })
        .collect()
}
