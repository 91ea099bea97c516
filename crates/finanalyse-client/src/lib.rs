use analysis_core::{
    normalize_ticker, AdvancedMetrics, AnalysisError, AnalysisResult, ApiErrorBody, ChatRequest,
    ChatResponse, CompanyProfile, CountryCompany, DividendData, MarketDataSource, MarketMover,
    NewsFeed, PriceHistory, ScreenerFilters, ScreenerResponse, SymbolMatch,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the FinAnalyse API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let timeout_secs = std::env::var("FINANALYSE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url: std::env::var("FINANALYSE_API_BASE")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP client for the FinAnalyse REST API.
///
/// Non-success responses become [`AnalysisError::Api`] carrying the server's
/// `detail` message. There is no retry: a failed call fails the action.
#[derive(Clone)]
pub struct FinAnalyseClient {
    client: Client,
    base_url: String,
}

impl FinAnalyseClient {
    pub fn new(config: ClientConfig) -> AnalysisResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_defaults() -> AnalysisResult<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AnalysisResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail);
            tracing::debug!("FinAnalyse API returned HTTP {}: {:?}", status, detail);
            return Err(AnalysisError::api(status.as_u16(), detail));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AnalysisResult<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        self.send(self.client.get(&url).query(query)).await
    }

    /// Company identity and headline figures
    pub async fn get_company(&self, ticker: &str) -> AnalysisResult<CompanyProfile> {
        let ticker = normalize_ticker(ticker)?;
        self.get(&format!("entreprise/{}", ticker), &[]).await
    }

    /// Daily closing prices
    pub async fn get_history(&self, ticker: &str) -> AnalysisResult<PriceHistory> {
        let ticker = normalize_ticker(ticker)?;
        self.get(&format!("historique/{}", ticker), &[]).await
    }

    pub async fn get_advanced_metrics(&self, ticker: &str) -> AnalysisResult<AdvancedMetrics> {
        let ticker = normalize_ticker(ticker)?;
        self.get(&format!("advanced-metrics/{}", ticker), &[]).await
    }

    pub async fn get_dividends(&self, ticker: &str) -> AnalysisResult<DividendData> {
        let ticker = normalize_ticker(ticker)?;
        self.get(&format!("dividends/{}", ticker), &[]).await
    }

    /// Run the stock screener. Unset filters are not sent.
    pub async fn get_screener(&self, filters: &ScreenerFilters) -> AnalysisResult<ScreenerResponse> {
        self.get("screener", &filters.query_pairs()).await
    }

    pub async fn search_symbols(&self, query: &str) -> AnalysisResult<Vec<SymbolMatch>> {
        self.get("search", &[("query", query.trim().to_string())]).await
    }

    pub async fn get_companies_by_country(
        &self,
        country_code: &str,
    ) -> AnalysisResult<Vec<CountryCompany>> {
        let code = country_code.trim().to_uppercase();
        if code.is_empty() {
            return Err(AnalysisError::InvalidInput("country code must not be empty".to_string()));
        }
        self.get(&format!("companies-by-country/{}", code), &[]).await
    }

    pub async fn get_gainers(&self) -> AnalysisResult<Vec<MarketMover>> {
        self.get("gainers", &[]).await
    }

    pub async fn get_losers(&self) -> AnalysisResult<Vec<MarketMover>> {
        self.get("losers", &[]).await
    }

    pub async fn get_news(&self) -> AnalysisResult<NewsFeed> {
        self.get("news", &[]).await
    }

    /// Send one chat message on behalf of `session_id`
    pub async fn post_chat(&self, session_id: &str, message: &str) -> AnalysisResult<ChatResponse> {
        let url = self.url("chat");
        let request = ChatRequest {
            session_id: session_id.to_string(),
            message: message.to_string(),
        };
        tracing::debug!("POST {}", url);
        self.send(self.client.post(&url).json(&request)).await
    }
}

#[async_trait]
impl MarketDataSource for FinAnalyseClient {
    async fn company_profile(&self, ticker: &str) -> AnalysisResult<CompanyProfile> {
        self.get_company(ticker).await
    }

    async fn price_history(&self, ticker: &str) -> AnalysisResult<PriceHistory> {
        self.get_history(ticker).await
    }

    async fn advanced_metrics(&self, ticker: &str) -> AnalysisResult<AdvancedMetrics> {
        self.get_advanced_metrics(ticker).await
    }

    async fn dividends(&self, ticker: &str) -> AnalysisResult<DividendData> {
        self.get_dividends(ticker).await
    }

    async fn screener(&self, filters: &ScreenerFilters) -> AnalysisResult<ScreenerResponse> {
        self.get_screener(filters).await
    }

    async fn search(&self, query: &str) -> AnalysisResult<Vec<SymbolMatch>> {
        self.search_symbols(query).await
    }

    async fn companies_by_country(&self, country_code: &str) -> AnalysisResult<Vec<CountryCompany>> {
        self.get_companies_by_country(country_code).await
    }

    async fn gainers(&self) -> AnalysisResult<Vec<MarketMover>> {
        self.get_gainers().await
    }

    async fn losers(&self) -> AnalysisResult<Vec<MarketMover>> {
        self.get_losers().await
    }

    async fn news(&self) -> AnalysisResult<NewsFeed> {
        self.get_news().await
    }

    async fn chat(&self, session_id: &str, message: &str) -> AnalysisResult<ChatResponse> {
        self.post_chat(session_id, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn entreprise(Path(ticker): Path<String>) -> (StatusCode, Json<Value>) {
        if ticker == "AAPL" {
            (
                StatusCode::OK,
                Json(json!({
                    "name": "Apple Inc.",
                    "symbol": "AAPL",
                    "sector": "Technology",
                    "peRatio": 29.4,
                    "roe": 1.47,
                    "netMargin": null
                })),
            )
        } else {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": format!("Symbol '{}' not found", ticker) })),
            )
        }
    }

    async fn screener(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        // Echo the received filters back as the result names.
        let mut keys: Vec<String> = params.keys().cloned().collect();
        keys.sort();
        let results: Vec<Value> = keys
            .into_iter()
            .map(|k| json!({ "symbol": k, "name": params[&k] }))
            .collect();
        Json(json!({ "results": results }))
    }

    async fn chat(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({
            "response": format!("{} says {}", body["session_id"].as_str().unwrap_or(""), body["message"].as_str().unwrap_or(""))
        }))
    }

    async fn start_stub() -> String {
        let app = Router::new()
            .route("/api/entreprise/:ticker", get(entreprise))
            .route("/api/screener", get(screener))
            .route("/api/chat", post(chat))
            .route("/api/gainers", get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream down") }))
            .route("/api/losers", get(|| async { "not json" }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/", addr)
    }

    async fn client() -> FinAnalyseClient {
        FinAnalyseClient::new(ClientConfig::new(start_stub().await)).unwrap()
    }

    #[tokio::test]
    async fn test_get_company_normalizes_ticker() {
        let client = client().await;
        let profile = client.get_company(" aapl ").await.unwrap();
        assert_eq!(profile.name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.pe_ratio, Some(29.4));
        assert_eq!(profile.net_margin, None);
    }

    #[tokio::test]
    async fn test_not_found_carries_server_detail() {
        let client = client().await;
        let err = client.get_company("zzzz").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Symbol 'ZZZZ' not found");
    }

    #[tokio::test]
    async fn test_error_without_detail_uses_fallback() {
        let client = client().await;
        let err = client.get_gainers().await.unwrap_err();
        assert!(matches!(err, AnalysisError::Api { status: 503, .. }));
        assert_eq!(err.to_string(), "request failed with status 503");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let client = client().await;
        let err = client.get_losers().await.unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[tokio::test]
    async fn test_empty_ticker_is_rejected_before_request() {
        let client = client().await;
        let err = client.get_history("  ").await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_screener_sends_only_set_filters() {
        let client = client().await;
        let filters = ScreenerFilters {
            sector: Some("Energy".to_string()),
            pe_max: None,
            dividend_min: Some(3.0),
        };
        let response = client.get_screener(&filters).await.unwrap();
        let sent: Vec<(Option<String>, Option<String>)> = response
            .results
            .into_iter()
            .map(|hit| (hit.symbol, hit.name))
            .collect();
        assert_eq!(
            sent,
            vec![
                (Some("dividend_min".to_string()), Some("3".to_string())),
                (Some("sector".to_string()), Some("Energy".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_chat_posts_session_and_message() {
        let client = client().await;
        let reply = client.post_chat("session_1_abcdefghi", "hello").await.unwrap();
        assert_eq!(reply.response, "session_1_abcdefghi says hello");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = FinAnalyseClient::new(
            ClientConfig::new(format!("http://{}/api", addr)).with_timeout(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.get_news().await.unwrap_err();
        assert!(matches!(err, AnalysisError::Http(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = FinAnalyseClient::new(ClientConfig::new("http://example.test/api///")).unwrap();
        assert_eq!(client.base_url(), "http://example.test/api");
        assert_eq!(client.url("gainers"), "http://example.test/api/gainers");
    }
}
