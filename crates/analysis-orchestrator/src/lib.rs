use analysis_core::{
    normalize_ticker, AdvancedMetrics, AnalysisResult, CompanyProfile, DividendData,
    MarketDataSource, MetricsRecord, NewsArticle, PriceHistory, ScreenerFilters, SymbolMatch,
};
use fundamental_analysis::{
    comparison_table, Commentary, ComparisonRow, ComparisonSummary, FundamentalAnalysisEngine,
    ScoreBreakdown,
};
use serde::Serialize;
use std::sync::Arc;

pub mod charts;
pub mod chat;
pub mod market;
pub mod screener;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use charts::{dividend_chart, price_chart, ChartKind, ChartSpec};
pub use chat::{generate_session_id, is_valid_session_id, ChatSession, SessionStore};
pub use market::{CountryListing, MarketMovers, COUNTRY_LISTING_LIMIT, MOVERS_LIMIT};
pub use screener::{ScreenerResult, StockScreener};
pub use session::AnalysisSession;

/// Everything produced by one company analysis.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyAnalysis {
    pub ticker: String,
    pub profile: CompanyProfile,
    pub advanced: AdvancedMetrics,
    pub dividends: DividendData,
    pub metrics: MetricsRecord,
    pub breakdown: ScoreBreakdown,
    pub commentary: Commentary,
    pub price_chart: ChartSpec,
    pub dividend_chart: Option<ChartSpec>,
}

impl CompanyAnalysis {
    pub fn score(&self) -> f64 {
        self.breakdown.score
    }
}

/// Side-by-side view of two companies.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub first: MetricsRecord,
    pub second: MetricsRecord,
    pub table: Vec<ComparisonRow>,
    pub summary: ComparisonSummary,
}

pub struct AnalysisOrchestrator {
    source: Arc<dyn MarketDataSource>,
    engine: FundamentalAnalysisEngine,
}

impl AnalysisOrchestrator {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self::with_engine(source, FundamentalAnalysisEngine::new())
    }

    pub fn with_engine(source: Arc<dyn MarketDataSource>, engine: FundamentalAnalysisEngine) -> Self {
        Self { source, engine }
    }

    pub fn source(&self) -> &Arc<dyn MarketDataSource> {
        &self.source
    }

    pub fn engine(&self) -> &FundamentalAnalysisEngine {
        &self.engine
    }

    /// Fetch profile, history, advanced metrics and dividends concurrently,
    /// then score and describe the merged record. Any failed fetch fails the
    /// whole analysis.
    pub async fn analyze(&self, ticker: &str) -> AnalysisResult<CompanyAnalysis> {
        let ticker = normalize_ticker(ticker)?;
        tracing::info!("Starting analysis for {}", ticker);

        let (profile, history, advanced, dividends) = tokio::try_join!(
            self.source.company_profile(&ticker),
            self.source.price_history(&ticker),
            self.source.advanced_metrics(&ticker),
            self.source.dividends(&ticker),
        )?;

        Ok(self.assemble(ticker, profile, history, advanced, dividends))
    }

    fn assemble(
        &self,
        ticker: String,
        profile: CompanyProfile,
        history: PriceHistory,
        advanced: AdvancedMetrics,
        dividends: DividendData,
    ) -> CompanyAnalysis {
        let metrics = MetricsRecord::merge(&profile, &advanced);
        let (breakdown, commentary) = self.engine.assess(&metrics);

        tracing::info!(
            "Analysis complete for {}: score {}/10 ({} of {} points)",
            ticker,
            breakdown.score,
            breakdown.raw,
            breakdown.max_raw
        );

        let dividend_chart = dividend_chart(&dividends);
        if dividend_chart.is_none() {
            tracing::debug!("No dividend history for {}", ticker);
        }

        CompanyAnalysis {
            ticker,
            price_chart: price_chart(&history),
            dividend_chart,
            profile,
            advanced,
            dividends,
            metrics,
            breakdown,
            commentary,
        }
    }

    /// Merged profile + advanced metrics for one ticker.
    pub async fn fetch_metrics(&self, ticker: &str) -> AnalysisResult<MetricsRecord> {
        let ticker = normalize_ticker(ticker)?;
        let (profile, advanced) = tokio::try_join!(
            self.source.company_profile(&ticker),
            self.source.advanced_metrics(&ticker),
        )?;
        Ok(MetricsRecord::merge(&profile, &advanced))
    }

    pub fn compare_records(&self, first: &MetricsRecord, second: &MetricsRecord) -> ComparisonReport {
        ComparisonReport {
            table: comparison_table(first, second),
            summary: self.engine.compare(first, second),
            first: first.clone(),
            second: second.clone(),
        }
    }

    /// Compare two tickers without touching any session.
    pub async fn compare(&self, first: &str, second: &str) -> AnalysisResult<ComparisonReport> {
        let (a, b) = tokio::try_join!(self.fetch_metrics(first), self.fetch_metrics(second))?;
        Ok(self.compare_records(&a, &b))
    }

    pub async fn screen(&self, filters: ScreenerFilters) -> AnalysisResult<ScreenerResult> {
        StockScreener::new(Arc::clone(&self.source)).screen(filters).await
    }

    pub async fn market_movers(&self) -> AnalysisResult<MarketMovers> {
        market::market_movers(self.source.as_ref()).await
    }

    pub async fn companies_by_country(&self, country_code: &str) -> AnalysisResult<CountryListing> {
        market::companies_by_country(self.source.as_ref(), country_code).await
    }

    pub async fn search(&self, query: &str) -> AnalysisResult<Vec<SymbolMatch>> {
        market::search(self.source.as_ref(), query).await
    }

    pub async fn news(&self) -> AnalysisResult<Vec<NewsArticle>> {
        market::news(self.source.as_ref()).await
    }

    pub fn chat(&self, store: &SessionStore) -> AnalysisResult<ChatSession> {
        ChatSession::open(Arc::clone(&self.source), store)
    }
}
