use analysis_core::{AnalysisResult, MarketDataSource, ScreenerFilters, ScreenerHit};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct ScreenerResult {
    pub filters: ScreenerFilters,
    pub hits: Vec<ScreenerHit>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ScreenerResult {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Runs a filtered screen against the backend.
pub struct StockScreener {
    source: Arc<dyn MarketDataSource>,
}

impl StockScreener {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self { source }
    }

    pub async fn screen(&self, filters: ScreenerFilters) -> AnalysisResult<ScreenerResult> {
        tracing::info!("Starting screen with {} active filter(s)", filters.query_pairs().len());

        let response = self.source.screener(&filters).await?;
        let total = response.results.len();

        // Rows without a symbol cannot be analyzed further.
        let hits: Vec<ScreenerHit> = response
            .results
            .into_iter()
            .filter(|hit| {
                let keep = hit.symbol.as_deref().is_some_and(|s| !s.trim().is_empty());
                if !keep {
                    tracing::warn!("Dropping screener row without a symbol: {:?}", hit.name);
                }
                keep
            })
            .collect();

        tracing::info!("Screen complete: {} of {} rows returned", hits.len(), total);

        Ok(ScreenerResult {
            filters,
            hits,
            timestamp: chrono::Utc::now(),
        })
    }
}
