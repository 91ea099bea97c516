//! Financial score on a 0-10 scale.
//!
//! Each category awards points from a ladder of thresholds; the first rung the
//! metric satisfies wins. Categories are independent. The raw sum is rescaled
//! against the maximum attainable total and capped at 10.

use analysis_core::{Metric, MetricsRecord};
use serde::Serialize;

/// How a metric is compared against a rung's bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Threshold {
    /// `value > bound`
    Above,
    /// `value < bound`
    Below,
}

/// One rung of a category ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tier {
    pub bound: f64,
    pub points: u32,
    /// Optional exclusive lower limit, e.g. a P/E must be positive to earn
    /// the cheap-valuation rung.
    pub floor: Option<f64>,
}

impl Tier {
    pub fn new(bound: f64, points: u32) -> Self {
        Self { bound, points, floor: None }
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRule {
    pub name: &'static str,
    pub metric: Metric,
    pub threshold: Threshold,
    pub tiers: Vec<Tier>,
}

impl CategoryRule {
    pub fn max_points(&self) -> u32 {
        self.tiers.iter().map(|t| t.points).max().unwrap_or(0)
    }

    /// Points for `value`. A missing value satisfies no rung.
    pub fn points_for(&self, value: Option<f64>) -> u32 {
        let Some(v) = value else {
            return 0;
        };
        self.tiers
            .iter()
            .find(|tier| {
                let above_floor = tier.floor.map_or(true, |floor| v > floor);
                let passes = match self.threshold {
                    Threshold::Above => v > tier.bound,
                    Threshold::Below => v < tier.bound,
                };
                above_floor && passes
            })
            .map(|tier| tier.points)
            .unwrap_or(0)
    }
}

/// Category ladders used by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringConfig {
    pub categories: Vec<CategoryRule>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                CategoryRule {
                    name: "Return on equity",
                    metric: Metric::Roe,
                    threshold: Threshold::Above,
                    tiers: vec![Tier::new(0.20, 2), Tier::new(0.10, 1)],
                },
                CategoryRule {
                    name: "Net margin",
                    metric: Metric::NetMargin,
                    threshold: Threshold::Above,
                    tiers: vec![Tier::new(0.15, 2), Tier::new(0.05, 1)],
                },
                // A negative P/E misses the first rung but still clears `< 25`.
                CategoryRule {
                    name: "Valuation",
                    metric: Metric::PeRatio,
                    threshold: Threshold::Below,
                    tiers: vec![
                        Tier::new(15.0, 3).with_floor(0.0),
                        Tier::new(25.0, 2),
                        Tier::new(40.0, 1),
                    ],
                },
                CategoryRule {
                    name: "Leverage",
                    metric: Metric::DebtToEquity,
                    threshold: Threshold::Below,
                    tiers: vec![Tier::new(0.5, 3), Tier::new(1.0, 2), Tier::new(2.0, 1)],
                },
                CategoryRule {
                    name: "Scale",
                    metric: Metric::Revenue,
                    threshold: Threshold::Above,
                    tiers: vec![Tier::new(100e9, 2), Tier::new(20e9, 1)],
                },
                CategoryRule {
                    name: "Dividend",
                    metric: Metric::DividendYield,
                    threshold: Threshold::Above,
                    tiers: vec![Tier::new(0.03, 2), Tier::new(0.01, 1)],
                },
            ],
        }
    }
}

impl ScoringConfig {
    /// Highest attainable raw total (14 for the default ladders).
    pub fn max_raw(&self) -> u32 {
        self.categories.iter().map(CategoryRule::max_points).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub name: &'static str,
    pub metric: Metric,
    pub points: u32,
    pub max_points: u32,
}

/// Per-category detail behind a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub categories: Vec<CategoryScore>,
    pub raw: u32,
    pub max_raw: u32,
    pub score: f64,
}

pub fn score_breakdown(metrics: &MetricsRecord, config: &ScoringConfig) -> ScoreBreakdown {
    let categories: Vec<CategoryScore> = config
        .categories
        .iter()
        .map(|rule| CategoryScore {
            name: rule.name,
            metric: rule.metric,
            points: rule.points_for(metrics.value(rule.metric)),
            max_points: rule.max_points(),
        })
        .collect();

    let raw = categories.iter().map(|c| c.points).sum();
    let max_raw = config.max_raw();
    ScoreBreakdown {
        categories,
        raw,
        max_raw,
        score: rescale(raw, max_raw),
    }
}

/// `min(10, round(raw / max * 10, 1 decimal))`
fn rescale(raw: u32, max_raw: u32) -> f64 {
    if max_raw == 0 {
        return 0.0;
    }
    let score = (raw as f64 / max_raw as f64 * 100.0).round() / 10.0;
    score.min(10.0)
}

/// Score with the default ladders.
pub fn compute_score(metrics: &MetricsRecord) -> f64 {
    score_breakdown(metrics, &ScoringConfig::default()).score
}
