use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response. `detail` is the server-supplied message when the
    /// body carried one, a generic fallback otherwise.
    #[error("{detail}")]
    Api { status: u16, detail: String },

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No company has been analyzed yet; run an analysis before comparing")]
    NoActiveAnalysis,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub fn api(status: u16, detail: Option<String>) -> Self {
        let detail = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {}", status));
        AnalysisError::Api { status, detail }
    }

    /// True when the API answered 404 for the requested symbol.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AnalysisError::Api { status: 404, .. })
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
