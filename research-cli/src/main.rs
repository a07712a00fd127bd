mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use insight_strategy::{
    split_csv_list, EtfInsightConfig, EtfInsightPipeline, LlmClient, LlmConfig, RagRetriever,
};
use research_core::InsightOutcome;
use research_data_services::{
    ArticleFetcher, ChartSeries, CorpusIngestionPipeline, DataPaths, Embedder, FastEmbedder,
    ScreeningParams, SimilarityParams, TabularStore,
};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use settings::Settings;

/// Mezzanine bond research and ETF insight CLI
///
/// Queries the bond issuance, quarterly report and market snapshot files,
/// and generates ETF recommendations for news articles or keywords.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the three report CSV files
    /// (defaults to RESEARCH_DATA_DIR, then "data")
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Historical bonds closest to a target amount and coupon rate
    SimilarBonds {
        /// Target issue amount (KRW)
        #[arg(long)]
        amount: f64,

        /// Target coupon rate (%)
        #[arg(long)]
        rate: f64,

        #[arg(long, default_value_t = 5)]
        count: usize,

        /// Fractional amount window (0.3 = ±30%)
        #[arg(long, default_value_t = 0.3)]
        amount_tolerance: f64,

        /// Rate window in hundredths of a rate point
        #[arg(long, default_value_t = 2.0)]
        rate_tolerance_points: f64,
    },

    /// Companies likely to issue a new bond
    Issuers {
        #[arg(long, default_value_t = 0.0)]
        min_market_cap: f64,

        #[arg(long, default_value_t = f64::INFINITY)]
        max_debt_ratio: f64,

        #[arg(long, default_value_t = 0.0)]
        min_shareholder_ratio: f64,

        #[arg(long, default_value_t = 9)]
        months_to_maturity: u32,

        #[arg(long, default_value_t = 10)]
        max_results: usize,

        /// Use each company's earliest bond maturity when the quarterly
        /// report has no prior-bond maturity column
        #[arg(long)]
        attach_bond_maturity: bool,
    },

    /// Market overview and bond issuance summary
    Overview,

    /// ETF recommendations for news article URLs
    EtfUrls {
        /// Article URLs (comma-separated)
        #[arg(long)]
        urls: String,
    },

    /// ETF recommendations for search keywords
    EtfKeywords {
        /// Keywords (comma-separated)
        #[arg(long)]
        keywords: String,
    },
}

fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "research_cli={},insight_strategy={},research_data_services={}",
                log_level, log_level, log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

fn outcome_json(outcome: &InsightOutcome) -> serde_json::Value {
    json!({
        "outcome": outcome,
        "message": outcome.message(),
    })
}

/// Build the ETF insight pipeline: embed the commentary corpus, connect the
/// LLM client and the article fetcher.
fn build_insight_pipeline(settings: &Settings) -> Result<EtfInsightPipeline> {
    let api_key = settings.require_openai_api_key()?.to_string();

    let embedder: Arc<dyn Embedder> =
        Arc::new(FastEmbedder::all_minilm().context("Failed to load embedding model")?);
    let (store, stats) = CorpusIngestionPipeline::new(embedder.clone())
        .ingest_bundled()
        .context("Failed to embed the commentary corpus")?;
    info!("Commentary corpus ready: {} documents", stats.documents_stored);

    let retriever = Arc::new(RagRetriever::new(embedder, Arc::new(store)));

    let llm_config = LlmConfig {
        model: settings.llm_model.clone(),
        ..Default::default()
    };
    let llm_client = Arc::new(LlmClient::openai(llm_config, api_key)?);

    let config = EtfInsightConfig::default();
    let fetcher = Arc::new(
        ArticleFetcher::new()
            .context("Failed to build article fetcher")?
            .with_max_tokens(config.max_article_tokens),
    );

    Ok(EtfInsightPipeline::new(
        config,
        fetcher,
        retriever,
        llm_client,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let settings = Settings::from_env();
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| settings.data_dir.clone());

    match cli.command {
        Command::SimilarBonds {
            amount,
            rate,
            count,
            amount_tolerance,
            rate_tolerance_points,
        } => {
            let store = TabularStore::load(&DataPaths::in_dir(&data_dir));
            let params = SimilarityParams {
                count,
                amount_tolerance,
                rate_tolerance_points,
            };
            let similar = store.find_similar_bonds(amount, rate, &params);
            let chart = ChartSeries::from_candidates(&similar);
            print_json(&json!({ "similar_bonds": similar, "chart": chart }))?;
        }
        Command::Issuers {
            min_market_cap,
            max_debt_ratio,
            min_shareholder_ratio,
            months_to_maturity,
            max_results,
            attach_bond_maturity,
        } => {
            let store = TabularStore::load(&DataPaths::in_dir(&data_dir));
            let params = ScreeningParams {
                min_market_cap,
                max_debt_ratio,
                min_shareholder_ratio,
                months_to_maturity,
                max_results,
                attach_bond_maturity,
            };
            print_json(&store.find_potential_issuers(&params))?;
        }
        Command::Overview => {
            let store = TabularStore::load(&DataPaths::in_dir(&data_dir));
            print_json(&json!({
                "market_overview": store.market_overview(),
                "issuance_summary": store.issuance_summary(),
            }))?;
        }
        Command::EtfUrls { urls } => {
            let pipeline = build_insight_pipeline(&settings)?;
            let results: Vec<serde_json::Value> = pipeline
                .insights_for_urls(&split_csv_list(&urls))
                .await
                .iter()
                .map(|r| {
                    let mut value = outcome_json(&r.outcome);
                    value["url"] = json!(r.url);
                    value
                })
                .collect();
            print_json(&results)?;
        }
        Command::EtfKeywords { keywords } => {
            let pipeline = build_insight_pipeline(&settings)?;
            let outcome = pipeline.insights_for_keywords(&split_csv_list(&keywords)).await;
            print_json(&outcome_json(&outcome))?;
        }
    }

    Ok(())
}
