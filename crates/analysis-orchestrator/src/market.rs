//! Market overview: movers, country listings, symbol search and news.

use analysis_core::{
    AnalysisResult, CountryCompany, MarketDataSource, MarketMover, NewsArticle, SymbolMatch,
};
use serde::Serialize;

/// Gainers and losers shown per side.
pub const MOVERS_LIMIT: usize = 5;
/// Companies shown per country before the listing is cut.
pub const COUNTRY_LISTING_LIMIT: usize = 9;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketMovers {
    pub gainers: Vec<MarketMover>,
    pub losers: Vec<MarketMover>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountryListing {
    pub country_code: String,
    pub companies: Vec<CountryCompany>,
    pub has_more: bool,
}

pub async fn market_movers(source: &dyn MarketDataSource) -> AnalysisResult<MarketMovers> {
    let (mut gainers, mut losers) = tokio::try_join!(source.gainers(), source.losers())?;
    gainers.truncate(MOVERS_LIMIT);
    losers.truncate(MOVERS_LIMIT);
    Ok(MarketMovers { gainers, losers })
}

pub async fn companies_by_country(
    source: &dyn MarketDataSource,
    country_code: &str,
) -> AnalysisResult<CountryListing> {
    let code = country_code.trim().to_uppercase();
    if code.is_empty() {
        return Ok(CountryListing::default());
    }

    let mut companies = source.companies_by_country(&code).await?;
    let has_more = companies.len() > COUNTRY_LISTING_LIMIT;
    companies.truncate(COUNTRY_LISTING_LIMIT);

    tracing::debug!("{} companies listed for {}", companies.len(), code);

    Ok(CountryListing {
        country_code: code,
        companies,
        has_more,
    })
}

pub async fn search(source: &dyn MarketDataSource, query: &str) -> AnalysisResult<Vec<SymbolMatch>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    source.search(query).await
}

pub async fn news(source: &dyn MarketDataSource) -> AnalysisResult<Vec<NewsArticle>> {
    Ok(source.news().await?.articles)
}
