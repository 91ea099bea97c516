use crate::{AnalysisOrchestrator, CompanyAnalysis, ComparisonReport};
use analysis_core::{normalize_ticker, AnalysisError, AnalysisResult};
use std::sync::Arc;

/// Keeps the most recent successful analysis so follow-up comparisons can
/// use it as their first side.
pub struct AnalysisSession {
    orchestrator: Arc<AnalysisOrchestrator>,
    last: Option<CompanyAnalysis>,
}

impl AnalysisSession {
    pub fn new(orchestrator: Arc<AnalysisOrchestrator>) -> Self {
        Self {
            orchestrator,
            last: None,
        }
    }

    pub fn last(&self) -> Option<&CompanyAnalysis> {
        self.last.as_ref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    /// On failure the previous analysis is kept.
    pub async fn analyze(&mut self, ticker: &str) -> AnalysisResult<&CompanyAnalysis> {
        let analysis = self.orchestrator.analyze(ticker).await?;
        Ok(&*self.last.insert(analysis))
    }

    pub async fn compare_with(&self, ticker: &str) -> AnalysisResult<ComparisonReport> {
        let current = self.last.as_ref().ok_or(AnalysisError::NoActiveAnalysis)?;
        let ticker = normalize_ticker(ticker)?;

        tracing::info!("Comparing {} with {}", current.ticker, ticker);

        let other = self.orchestrator.fetch_metrics(&ticker).await?;
        Ok(self.orchestrator.compare_records(&current.metrics, &other))
    }
}
