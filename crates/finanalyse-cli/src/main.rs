//! finanalyse: score, describe and compare listed companies from the terminal.
//!
//! Usage:
//!   finanalyse analyze AAPL
//!   finanalyse analyze AAPL --compare MSFT
//!   finanalyse compare KO PEP --metrics basic
//!   finanalyse screener --sector Technology --pe-max 25
//!   finanalyse chat "Is Apple overvalued?"

mod render;

use analysis_core::ScreenerFilters;
use analysis_orchestrator::{AnalysisOrchestrator, AnalysisSession, SessionStore};
use clap::{Parser, Subcommand, ValueEnum};
use finanalyse_client::{ClientConfig, FinAnalyseClient};
use fundamental_analysis::{ComparisonConfig, FundamentalAnalysisEngine, ScoringConfig};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_LOG_FILTER: &str = "finanalyse=info,analysis_orchestrator=info,finanalyse_client=warn";

#[derive(Parser, Debug)]
#[command(name = "finanalyse")]
#[command(about = "Fundamental scoring and commentary for listed companies", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the FinAnalyse API
    #[arg(long, global = true, env = "FINANALYSE_API_BASE")]
    api_base: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "FINANALYSE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a company and describe its financial health
    Analyze {
        ticker: String,
        /// Compare the analyzed company with another ticker
        #[arg(long, value_name = "OTHER")]
        compare: Option<String>,
    },
    /// Compare two companies side by side
    Compare {
        first: String,
        second: String,
        #[arg(long, value_enum, default_value = "full")]
        metrics: MetricSet,
    },
    /// Filter companies by sector, P/E and dividend yield
    Screener {
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        pe_max: Option<f64>,
        /// Minimum dividend yield in percent (2 = 2%)
        #[arg(long)]
        dividend_min: Option<f64>,
    },
    /// Look up ticker symbols
    Search { query: String },
    /// Top gainers and losers of the day
    Movers,
    /// Companies listed in a country
    Country { code: String },
    /// Latest market news
    News,
    /// Ask the assistant a question
    Chat {
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MetricSet {
    /// P/E, ROE, net margin and debt/equity
    Full,
    /// P/E and ROE only
    Basic,
}

impl MetricSet {
    fn comparison_config(self) -> ComparisonConfig {
        match self {
            MetricSet::Full => ComparisonConfig::default(),
            MetricSet::Basic => ComparisonConfig::valuation_and_profitability(),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn client_config(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::default();
    if let Some(base) = &cli.api_base {
        config.base_url = base.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = client_config(&cli);
    tracing::debug!("Using API at {}", config.base_url);
    let client = Arc::new(FinAnalyseClient::new(config)?);
    let json = cli.json;

    match cli.command {
        Command::Analyze { ticker, compare } => {
            let orchestrator = Arc::new(AnalysisOrchestrator::new(client));
            let mut session = AnalysisSession::new(orchestrator);

            let analysis = session.analyze(&ticker).await?;
            emit(json, analysis, render::analysis)?;

            if let Some(other) = compare {
                let report = session.compare_with(&other).await?;
                emit(json, &report, render::comparison)?;
            }
        }
        Command::Compare {
            first,
            second,
            metrics,
        } => {
            let engine =
                FundamentalAnalysisEngine::with_config(ScoringConfig::default(), metrics.comparison_config());
            let orchestrator = AnalysisOrchestrator::with_engine(client, engine);
            let report = orchestrator.compare(&first, &second).await?;
            emit(json, &report, render::comparison)?;
        }
        Command::Screener {
            sector,
            pe_max,
            dividend_min,
        } => {
            let orchestrator = AnalysisOrchestrator::new(client);
            let filters = ScreenerFilters {
                sector,
                pe_max,
                dividend_min,
            };
            let result = orchestrator.screen(filters).await?;
            emit(json, &result, render::screener)?;
        }
        Command::Search { query } => {
            let matches = AnalysisOrchestrator::new(client).search(&query).await?;
            emit(json, &matches, |m| render::search(m))?;
        }
        Command::Movers => {
            let movers = AnalysisOrchestrator::new(client).market_movers().await?;
            emit(json, &movers, render::movers)?;
        }
        Command::Country { code } => {
            let listing = AnalysisOrchestrator::new(client)
                .companies_by_country(&code)
                .await?;
            emit(json, &listing, render::country)?;
        }
        Command::News => {
            let articles = AnalysisOrchestrator::new(client).news().await?;
            emit(json, &articles, |a| render::news(a))?;
        }
        Command::Chat { message } => {
            let store = SessionStore::default_location()?;
            let chat = AnalysisOrchestrator::new(client).chat(&store)?;
            let message = message.join(" ");
            match chat.send(&message).await? {
                Some(reply) => {
                    let payload = serde_json::json!({
                        "session_id": chat.session_id(),
                        "response": reply,
                    });
                    emit(json, &payload, |_| reply.clone())?;
                }
                None => tracing::warn!("Empty message, nothing sent"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_with_compare() {
        let cli = Cli::try_parse_from(["finanalyse", "analyze", "aapl", "--compare", "msft"]).unwrap();
        match cli.command {
            Command::Analyze { ticker, compare } => {
                assert_eq!(ticker, "aapl");
                assert_eq!(compare.as_deref(), Some("msft"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_compare_basic_metrics() {
        let cli =
            Cli::try_parse_from(["finanalyse", "--json", "compare", "KO", "PEP", "--metrics", "basic"])
                .unwrap();
        assert!(cli.json);
        match cli.command {
            Command::Compare { metrics, .. } => {
                assert_eq!(metrics, MetricSet::Basic);
                assert_eq!(metrics.comparison_config().metrics.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_chat_joins_words() {
        let cli = Cli::try_parse_from(["finanalyse", "chat", "is", "KO", "cheap?"]).unwrap();
        match cli.command {
            Command::Chat { message } => assert_eq!(message.join(" "), "is KO cheap?"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_dividend_min_is_percent() {
        let cli = Cli::try_parse_from(["finanalyse", "screener", "--dividend-min", "2"]).unwrap();
        match cli.command {
            Command::Screener { dividend_min, .. } => {
                let filters = ScreenerFilters {
                    dividend_min,
                    ..Default::default()
                };
                assert_eq!(filters.query_pairs(), vec![("dividend_min", "2".to_string())]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_default_log_filter_covers_orchestrator() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(target: "analysis_orchestrator", tracing::Level::INFO));
            assert!(tracing::enabled!(target: "analysis_orchestrator::screener", tracing::Level::WARN));
            assert!(tracing::enabled!(target: "finanalyse", tracing::Level::INFO));
            assert!(!tracing::enabled!(target: "finanalyse_client", tracing::Level::INFO));
        });
    }

    #[test]
    fn test_flags_override_client_config() {
        let cli = Cli::try_parse_from([
            "finanalyse",
            "--api-base",
            "http://example.test/api",
            "--timeout-secs",
            "5",
            "movers",
        ])
        .unwrap();
        let config = client_config(&cli);
        assert_eq!(config.base_url, "http://example.test/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
