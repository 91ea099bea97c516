use crate::types::{AdvancedMetrics, CompanyProfile};
use serde::{Deserialize, Serialize};

/// Numeric metrics consulted by scoring and comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Roe,
    NetMargin,
    PeRatio,
    DebtToEquity,
    Revenue,
    DividendYield,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Roe => "ROE",
            Metric::NetMargin => "Net margin",
            Metric::PeRatio => "P/E",
            Metric::DebtToEquity => "Debt/Equity",
            Metric::Revenue => "Revenue",
            Metric::DividendYield => "Dividend yield",
        }
    }
}

/// Merged view of a company: the company profile overlaid with its advanced
/// metrics. Every field may be missing; consumers read numbers through
/// [`MetricsRecord::value`], which also drops NaN and infinities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub net_margin: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub current_ratio: Option<f64>,
    #[serde(default)]
    pub quick_ratio: Option<f64>,
    #[serde(default)]
    pub interest_coverage: Option<f64>,
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
}

impl MetricsRecord {
    /// Overlay `advanced` onto `profile`. A present advanced value wins on
    /// collision; an absent one leaves the profile value in place.
    pub fn merge(profile: &CompanyProfile, advanced: &AdvancedMetrics) -> Self {
        Self {
            name: profile.name.clone(),
            symbol: profile.symbol.clone(),
            sector: profile.sector.clone(),
            country: profile.country.clone(),
            price: profile.price,
            roe: profile.roe,
            net_margin: profile.net_margin,
            pe_ratio: profile.pe_ratio,
            debt_to_equity: advanced.debt_to_equity,
            revenue: profile.revenue,
            net_income: profile.net_income,
            dividend_yield: advanced.dividend_yield.or(profile.dividend_yield),
            current_ratio: advanced.current_ratio,
            quick_ratio: advanced.quick_ratio,
            interest_coverage: advanced.interest_coverage,
            free_cash_flow: advanced.free_cash_flow,
        }
    }

    /// Finite value of `metric`, or `None` when missing or not a number.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        let raw = match metric {
            Metric::Roe => self.roe,
            Metric::NetMargin => self.net_margin,
            Metric::PeRatio => self.pe_ratio,
            Metric::DebtToEquity => self.debt_to_equity,
            Metric::Revenue => self.revenue,
            Metric::DividendYield => self.dividend_yield,
        };
        finite(raw)
    }

    /// Name used in generated text: company name, then symbol.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.symbol.as_deref().filter(|s| !s.trim().is_empty()))
            .unwrap_or("This company")
    }
}

impl From<&CompanyProfile> for MetricsRecord {
    fn from(profile: &CompanyProfile) -> Self {
        MetricsRecord::merge(profile, &AdvancedMetrics::default())
    }
}

pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
