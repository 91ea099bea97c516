//! Fundamental scoring and commentary.
//!
//! Everything here is a pure function of its inputs: no I/O, no clock, no
//! randomness. Identical records always produce identical scores and text.

pub mod comparison;
pub mod format;
pub mod narrative;
pub mod scoring;

pub use comparison::{
    compare_strengths, comparison_table, generate_comparison_summary, Better, ComparedMetric,
    ComparisonConfig, ComparisonOutcome, ComparisonRow, ComparisonSummary, Side, Strength,
    DISCLAIMER,
};
pub use narrative::{generate_comment, Commentary, Fact, Verdict};
pub use scoring::{
    compute_score, score_breakdown, CategoryRule, CategoryScore, ScoreBreakdown, ScoringConfig,
    Threshold, Tier,
};

use analysis_core::MetricsRecord;

/// Scoring and comparison rules bundled together, so callers can swap the
/// threshold set in one place.
#[derive(Debug, Clone, Default)]
pub struct FundamentalAnalysisEngine {
    scoring: ScoringConfig,
    comparison: ComparisonConfig,
}

impl FundamentalAnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(scoring: ScoringConfig, comparison: ComparisonConfig) -> Self {
        Self { scoring, comparison }
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn comparison_config(&self) -> &ComparisonConfig {
        &self.comparison
    }

    pub fn score(&self, metrics: &MetricsRecord) -> ScoreBreakdown {
        score_breakdown(metrics, &self.scoring)
    }

    /// Score the record and describe it.
    pub fn assess(&self, metrics: &MetricsRecord) -> (ScoreBreakdown, Commentary) {
        let breakdown = self.score(metrics);
        let commentary = generate_comment(metrics, breakdown.score);
        (breakdown, commentary)
    }

    pub fn compare(&self, a: &MetricsRecord, b: &MetricsRecord) -> ComparisonSummary {
        compare_strengths(a, b, &self.comparison)
    }
}
