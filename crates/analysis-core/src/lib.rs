pub mod error;
pub mod metrics;
pub mod traits;
pub mod types;

pub use error::*;
pub use metrics::*;
pub use traits::*;
pub use types::*;

/// Normalise a user-supplied ticker: trimmed and upper-cased.
pub fn normalize_ticker(raw: &str) -> AnalysisResult<String> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AnalysisError::InvalidInput("ticker must not be empty".to_string()));
    }
    Ok(ticker)
}
