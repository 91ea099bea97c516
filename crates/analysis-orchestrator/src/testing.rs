//! In-memory data source for orchestrator tests.

use analysis_core::{
    AdvancedMetrics, AnalysisError, AnalysisResult, ChatRequest, ChatResponse, CompanyProfile,
    CountryCompany, DividendData, DividendHistory, MarketDataSource, MarketMover, NewsArticle,
    NewsFeed, PriceHistory, ScreenerFilters, ScreenerHit, ScreenerResponse, SymbolMatch,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeSource {
    pub companies: HashMap<String, (CompanyProfile, AdvancedMetrics)>,
    /// Tickers whose price history endpoint answers 500.
    pub broken_history: Vec<String>,
    pub movers: Vec<MarketMover>,
    pub country: Vec<CountryCompany>,
    pub calls: AtomicUsize,
    pub screener_requests: Mutex<Vec<ScreenerFilters>>,
    pub chat_requests: Mutex<Vec<ChatRequest>>,
}

impl FakeSource {
    pub fn with_company(mut self, profile: CompanyProfile, advanced: AdvancedMetrics) -> Self {
        let ticker = profile.symbol.clone().unwrap_or_default();
        self.companies.insert(ticker, (profile, advanced));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn lookup(&self, ticker: &str) -> AnalysisResult<&(CompanyProfile, AdvancedMetrics)> {
        self.companies
            .get(ticker)
            .ok_or_else(|| AnalysisError::api(404, Some(format!("Symbol '{}' not found", ticker))))
    }
}

pub fn movers(prefix: &str, count: usize) -> Vec<MarketMover> {
    (0..count)
        .map(|i| MarketMover {
            symbol: format!("{}{}", prefix, i),
            name: Some(format!("{} {}", prefix, i)),
            price: Some(10.0 + i as f64),
            changes_percentage: Some(1.5 * i as f64),
        })
        .collect()
}

#[async_trait]
impl MarketDataSource for FakeSource {
    async fn company_profile(&self, ticker: &str) -> AnalysisResult<CompanyProfile> {
        self.hit();
        Ok(self.lookup(ticker)?.0.clone())
    }

    async fn price_history(&self, ticker: &str) -> AnalysisResult<PriceHistory> {
        self.hit();
        if self.broken_history.iter().any(|t| t == ticker) {
            return Err(AnalysisError::api(500, None));
        }
        self.lookup(ticker)?;
        Ok(PriceHistory {
            dates: vec!["2024-06-03".to_string(), "2024-06-04".to_string()],
            prices: vec![100.0, 101.5],
        })
    }

    async fn advanced_metrics(&self, ticker: &str) -> AnalysisResult<AdvancedMetrics> {
        self.hit();
        Ok(self.lookup(ticker)?.1.clone())
    }

    async fn dividends(&self, ticker: &str) -> AnalysisResult<DividendData> {
        self.hit();
        let (profile, _) = self.lookup(ticker)?;
        let history = profile.dividend_yield.map(|_| DividendHistory {
            years: vec![2023, 2024],
            amounts: vec![1.0, 1.1],
        });
        Ok(DividendData {
            dividend_history: history,
            ..Default::default()
        })
    }

    async fn screener(&self, filters: &ScreenerFilters) -> AnalysisResult<ScreenerResponse> {
        self.hit();
        self.screener_requests.lock().unwrap().push(filters.clone());
        let results = self
            .companies
            .values()
            .map(|(p, _)| ScreenerHit {
                symbol: p.symbol.clone(),
                name: p.name.clone(),
                pe: p.pe_ratio,
                dividend_yield: p.dividend_yield,
            })
            .collect();
        Ok(ScreenerResponse { results })
    }

    async fn search(&self, query: &str) -> AnalysisResult<Vec<SymbolMatch>> {
        self.hit();
        let query = query.to_uppercase();
        let mut hits: Vec<SymbolMatch> = self
            .companies
            .keys()
            .filter(|t| t.contains(&query))
            .map(|t| SymbolMatch {
                symbol: t.clone(),
                name: None,
                exchange_short_name: None,
            })
            .collect();
        hits.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(hits)
    }

    async fn companies_by_country(&self, _country_code: &str) -> AnalysisResult<Vec<CountryCompany>> {
        self.hit();
        Ok(self.country.clone())
    }

    async fn gainers(&self) -> AnalysisResult<Vec<MarketMover>> {
        self.hit();
        Ok(self.movers.clone())
    }

    async fn losers(&self) -> AnalysisResult<Vec<MarketMover>> {
        self.hit();
        Ok(self.movers.iter().rev().cloned().collect())
    }

    async fn news(&self) -> AnalysisResult<NewsFeed> {
        self.hit();
        Ok(NewsFeed {
            articles: vec![NewsArticle {
                title: Some("Rates on hold".to_string()),
                ..Default::default()
            }],
        })
    }

    async fn chat(&self, session_id: &str, message: &str) -> AnalysisResult<ChatResponse> {
        self.hit();
        self.chat_requests.lock().unwrap().push(ChatRequest {
            session_id: session_id.to_string(),
            message: message.to_string(),
        });
        Ok(ChatResponse {
            response: format!("echo: {}", message),
        })
    }
}

/// Scores the full 14 points.
pub fn strong() -> (CompanyProfile, AdvancedMetrics) {
    (
        CompanyProfile {
            name: Some("Strong Co".to_string()),
            symbol: Some("STRG".to_string()),
            revenue: Some(150e9),
            pe_ratio: Some(12.0),
            roe: Some(0.25),
            net_margin: Some(0.20),
            dividend_yield: Some(0.01),
            ..Default::default()
        },
        AdvancedMetrics {
            debt_to_equity: Some(0.3),
            dividend_yield: Some(0.04),
            ..Default::default()
        },
    )
}

/// Scores a single point (ROE).
pub fn weak() -> (CompanyProfile, AdvancedMetrics) {
    (
        CompanyProfile {
            name: Some("Weak Co".to_string()),
            symbol: Some("WEAK".to_string()),
            revenue: Some(5e9),
            pe_ratio: Some(45.0),
            roe: Some(0.12),
            net_margin: Some(0.03),
            ..Default::default()
        },
        AdvancedMetrics {
            debt_to_equity: Some(2.5),
            ..Default::default()
        },
    )
}

pub fn fake() -> FakeSource {
    let (sp, sa) = strong();
    let (wp, wa) = weak();
    FakeSource::default().with_company(sp, sa).with_company(wp, wa)
}
