//! Templated commentary for a single company.

use std::fmt;

use analysis_core::{Metric, MetricsRecord};
use serde::Serialize;

use crate::format::{format_fixed, format_percentage};

/// Overall reading of a score; exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Excellent,
    Solid,
    Average,
    Challenged,
}

impl Verdict {
    /// Lower bounds are inclusive: 8 and up is excellent, 6 solid, 4 average.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 8.0 => Verdict::Excellent,
            s if s >= 6.0 => Verdict::Solid,
            s if s >= 4.0 => Verdict::Average,
            _ => Verdict::Challenged,
        }
    }

    pub fn phrase(&self) -> &'static str {
        match self {
            Verdict::Excellent => "is in excellent financial health.",
            Verdict::Solid => "is in a solid financial position.",
            Verdict::Average => "has a financial performance that is average, with points to watch.",
            Verdict::Challenged => "is facing significant challenges.",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Excellent => "Excellent",
            Verdict::Solid => "Solid",
            Verdict::Average => "Average",
            Verdict::Challenged => "Challenged",
        }
    }
}

/// Observation attached to the verdict, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Fact {
    StrongProfitability { roe: f64 },
    HighValuation { pe_ratio: f64 },
    ControlledDebt,
    WeakMargins { net_margin: f64 },
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fact::StrongProfitability { roe } => {
                write!(f, "Return on equity is remarkable ({}).", format_percentage(*roe))
            }
            Fact::HighValuation { pe_ratio } => {
                write!(f, "However, its valuation looks high (P/E of {}).", format_fixed(*pe_ratio, 1))
            }
            Fact::ControlledDebt => write!(f, "Debt is well under control."),
            Fact::WeakMargins { net_margin } => {
                write!(f, "Profit margins look weak ({}).", format_percentage(*net_margin))
            }
        }
    }
}

/// Structured commentary; `Display` renders the plain-text paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commentary {
    pub subject: String,
    pub score: f64,
    pub verdict: Verdict,
    pub facts: Vec<Fact>,
}

impl Commentary {
    pub fn headline(&self) -> String {
        format!("With a score of {}/10, {} {}", self.score, self.subject, self.verdict.phrase())
    }
}

impl fmt::Display for Commentary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.headline())?;
        for fact in &self.facts {
            write!(f, " {}", fact)?;
        }
        Ok(())
    }
}

pub fn generate_comment(metrics: &MetricsRecord, score: f64) -> Commentary {
    let mut facts = Vec::new();

    if let Some(roe) = metrics.value(Metric::Roe).filter(|roe| *roe > 0.15) {
        facts.push(Fact::StrongProfitability { roe });
    }
    if let Some(pe_ratio) = metrics.value(Metric::PeRatio).filter(|pe| *pe > 30.0) {
        facts.push(Fact::HighValuation { pe_ratio });
    }
    if metrics.value(Metric::DebtToEquity).is_some_and(|d| d < 1.0) {
        facts.push(Fact::ControlledDebt);
    }
    if let Some(net_margin) = metrics.value(Metric::NetMargin).filter(|m| *m < 0.05) {
        facts.push(Fact::WeakMargins { net_margin });
    }

    Commentary {
        subject: metrics.display_name().to_string(),
        score,
        verdict: Verdict::from_score(score),
        facts,
    }
}
