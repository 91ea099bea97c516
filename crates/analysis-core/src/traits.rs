use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    AdvancedMetrics, AnalysisResult, ChatResponse, CompanyProfile, CountryCompany, DividendData,
    MarketMover, NewsFeed, PriceHistory, ScreenerResponse, SymbolMatch,
};

/// Screener criteria. Only criteria that are set are sent upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenerFilters {
    pub sector: Option<String>,
    pub pe_max: Option<f64>,
    pub dividend_min: Option<f64>,
}

impl ScreenerFilters {
    /// Query parameters for the `screener` endpoint, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(sector) = self.sector.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("sector", sector.to_string()));
        }
        if let Some(pe_max) = self.pe_max.filter(|v| v.is_finite()) {
            pairs.push(("pe_max", pe_max.to_string()));
        }
        if let Some(dividend_min) = self.dividend_min.filter(|v| v.is_finite()) {
            pairs.push(("dividend_min", dividend_min.to_string()));
        }
        pairs
    }
}

/// Remote source of company data, implemented by the HTTP client and by
/// in-memory fakes in tests.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn company_profile(&self, ticker: &str) -> AnalysisResult<CompanyProfile>;

    async fn price_history(&self, ticker: &str) -> AnalysisResult<PriceHistory>;

    async fn advanced_metrics(&self, ticker: &str) -> AnalysisResult<AdvancedMetrics>;

    async fn dividends(&self, ticker: &str) -> AnalysisResult<DividendData>;

    async fn screener(&self, filters: &ScreenerFilters) -> AnalysisResult<ScreenerResponse>;

    async fn search(&self, query: &str) -> AnalysisResult<Vec<SymbolMatch>>;

    async fn companies_by_country(&self, country_code: &str) -> AnalysisResult<Vec<CountryCompany>>;

    async fn gainers(&self) -> AnalysisResult<Vec<MarketMover>>;

    async fn losers(&self) -> AnalysisResult<Vec<MarketMover>>;

    async fn news(&self) -> AnalysisResult<NewsFeed>;

    async fn chat(&self, session_id: &str, message: &str) -> AnalysisResult<ChatResponse>;
}
