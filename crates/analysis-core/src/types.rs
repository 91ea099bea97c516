use serde::{Deserialize, Serialize};

/// Company identity and headline figures (`entreprise/{ticker}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
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
    pub revenue: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub net_margin: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

/// Balance-sheet and cash-flow ratios (`advanced-metrics/{ticker}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedMetrics {
    #[serde(default)]
    pub current_ratio: Option<f64>,
    #[serde(default)]
    pub quick_ratio: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
    #[serde(default)]
    pub interest_coverage: Option<f64>,
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

/// Daily closing prices (`historique/{ticker}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub prices: Vec<f64>,
}

/// Annual dividend totals, one entry per calendar year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DividendHistory {
    #[serde(default)]
    pub years: Vec<i32>,
    #[serde(default)]
    pub amounts: Vec<f64>,
}

/// Dividend payload (`dividends/{ticker}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendData {
    #[serde(default)]
    pub dividend_rate: Option<f64>,
    #[serde(default)]
    pub payout_ratio: Option<f64>,
    #[serde(default)]
    pub dividend_history: Option<DividendHistory>,
}

impl DividendData {
    /// The dividend history when it holds at least one amount.
    pub fn non_empty_history(&self) -> Option<&DividendHistory> {
        self.dividend_history
            .as_ref()
            .filter(|history| !history.amounts.is_empty())
    }
}

/// One row of the stock screener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerHit {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pe: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenerResponse {
    #[serde(default)]
    pub results: Vec<ScreenerHit>,
}

/// Symbol search hit (`search?query=`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMatch {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange_short_name: Option<String>,
}

/// Company listed under a country (`companies-by-country/{code}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryCompany {
    pub symbol: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

/// Top gainer / loser of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMover {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub changes_percentage: Option<f64>,
}

/// News article. Field names follow the upstream news provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewsArticle {
    pub fn display_title(&self) -> &str {
        non_blank(&self.title).unwrap_or("Untitled")
    }

    /// Snippet first, then description.
    pub fn display_snippet(&self) -> &str {
        non_blank(&self.snippet)
            .or_else(|| non_blank(&self.description))
            .unwrap_or("No content available")
    }

    pub fn display_source(&self) -> &str {
        non_blank(&self.source).unwrap_or("Unknown source")
    }

    pub fn display_url(&self) -> &str {
        non_blank(&self.url).unwrap_or("#")
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsFeed {
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Error body returned by the API on non-success statuses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
