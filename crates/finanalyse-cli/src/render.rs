//! Plain-text rendering of orchestrator results.

use analysis_core::{MarketMover, NewsArticle, SymbolMatch};
use analysis_orchestrator::{
    CompanyAnalysis, ComparisonReport, CountryListing, MarketMovers, ScreenerResult,
};
use fundamental_analysis::format::{
    format_currency_billion, format_fixed, format_percentage, format_price, format_ratio, or_na,
};
use fundamental_analysis::Side;

pub fn analysis(a: &CompanyAnalysis) -> String {
    let m = &a.metrics;
    let mut lines = vec![
        format!("{} ({})", m.display_name(), a.ticker),
        format!(
            "Sector: {} | Country: {} | Price: {}",
            m.sector.as_deref().unwrap_or("N/A"),
            m.country.as_deref().unwrap_or("N/A"),
            or_na(m.price, format_price)
        ),
        format!(
            "Score: {}/10 ({})",
            a.breakdown.score,
            a.commentary.verdict.label()
        ),
    ];
    lines.extend(
        a.breakdown
            .categories
            .iter()
            .map(|c| format!("  {:<16} {}/{}", c.name, c.points, c.max_points)),
    );

    lines.push(String::new());
    lines.push(a.commentary.to_string());
    lines.push(String::new());

    let metrics = [
        ("Revenue", or_na(m.revenue, format_currency_billion)),
        ("Net income", or_na(m.net_income, format_currency_billion)),
        ("P/E", or_na(m.pe_ratio, |v| format_fixed(v, 1))),
        ("ROE", or_na(m.roe, format_percentage)),
        ("Net margin", or_na(m.net_margin, format_percentage)),
        ("Debt/Equity", or_na(m.debt_to_equity, |v| format_fixed(v, 2))),
        ("Current ratio", or_na(m.current_ratio, format_ratio)),
        ("Quick ratio", or_na(m.quick_ratio, format_ratio)),
        ("Interest cover", or_na(m.interest_coverage, format_ratio)),
        ("Free cash flow", or_na(m.free_cash_flow, format_currency_billion)),
        ("Dividend yield", or_na(m.dividend_yield, format_percentage)),
    ];
    lines.push("Key metrics".to_string());
    lines.extend(
        metrics
            .iter()
            .map(|(label, value)| format!("  {:<16} {}", label, value)),
    );
    lines.push(String::new());

    lines.push(match a.price_chart.range() {
        Some((low, high)) => format!(
            "{}: {} points, {} to {}",
            a.price_chart.label,
            a.price_chart.values.len(),
            format_price(low),
            format_price(high)
        ),
        None => format!("{}: no data", a.price_chart.label),
    });
    lines.push(match &a.dividend_chart {
        Some(chart) => {
            let bars: Vec<String> = chart
                .labels
                .iter()
                .zip(&chart.values)
                .map(|(year, amount)| format!("{} {}", year, format_price(*amount)))
                .collect();
            format!("{}: {}", chart.label, bars.join(", "))
        }
        None => "No dividend history available.".to_string(),
    });

    lines.join("\n")
}

pub fn comparison(report: &ComparisonReport) -> String {
    let s = &report.summary;
    let mut lines = vec![format!(
        "{:<16} {:>12} {:>12}",
        "Metric", s.subject_a, s.subject_b
    )];
    lines.extend(report.table.iter().map(|row| {
        let mark = |side: Side| if row.winner == Some(side) { "*" } else { " " };
        format!(
            "{:<16} {:>11}{} {:>11}{}",
            row.label,
            row.value_a,
            mark(Side::First),
            row.value_b,
            mark(Side::Second)
        )
    }));
    lines.push(String::new());
    lines.push(s.to_string());
    lines.join("\n")
}

pub fn screener(result: &ScreenerResult) -> String {
    if result.is_empty() {
        return "No companies match these criteria.".to_string();
    }
    let mut lines = vec![format!(
        "{:<8} {:<32} {:>8} {:>10}",
        "Symbol", "Name", "P/E", "Yield"
    )];
    lines.extend(result.hits.iter().map(|hit| {
        format!(
            "{:<8} {:<32} {:>8} {:>10}",
            hit.symbol.as_deref().unwrap_or(""),
            hit.name.as_deref().unwrap_or("N/A"),
            or_na(hit.pe, |v| format_fixed(v, 1)),
            or_na(hit.dividend_yield, format_percentage)
        )
    }));
    lines.join("\n")
}

pub fn search(matches: &[SymbolMatch]) -> String {
    if matches.is_empty() {
        return "No matching symbols.".to_string();
    }
    matches
        .iter()
        .map(|m| {
            format!(
                "{:<8} {} ({})",
                m.symbol,
                m.name.as_deref().unwrap_or("N/A"),
                m.exchange_short_name.as_deref().unwrap_or("N/A")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn mover_line(mover: &MarketMover) -> String {
    let change = mover
        .changes_percentage
        .filter(|v| v.is_finite())
        .map(|v| format!("{:+.2}%", v))
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "  {:<8} {:<28} {:>10} {:>9}",
        mover.symbol,
        mover.name.as_deref().unwrap_or("N/A"),
        or_na(mover.price, format_price),
        change
    )
}

pub fn movers(movers: &MarketMovers) -> String {
    let mut lines = vec!["Top gainers".to_string()];
    lines.extend(movers.gainers.iter().map(mover_line));
    lines.push("Top losers".to_string());
    lines.extend(movers.losers.iter().map(mover_line));
    lines.join("\n")
}

pub fn country(listing: &CountryListing) -> String {
    if listing.companies.is_empty() {
        return "No companies found for this country.".to_string();
    }
    let mut lines: Vec<String> = listing
        .companies
        .iter()
        .map(|c| {
            format!(
                "{:<8} {:<32} {}",
                c.symbol,
                c.company_name.as_deref().unwrap_or("N/A"),
                c.sector.as_deref().unwrap_or("N/A")
            )
        })
        .collect();
    if listing.has_more {
        lines.push("...".to_string());
    }
    lines.join("\n")
}

pub fn news(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return "No news available.".to_string();
    }
    articles
        .iter()
        .map(|a| {
            format!(
                "{}\n  {}\n  {} | {}",
                a.display_title(),
                a.display_snippet(),
                a.display_source(),
                a.display_url()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
