//! Classify stored postings that have no extraction yet.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use jobs_core::domains::enrichment::enrich_unenriched;
use jobs_core::kernel::{OpenAIJobClassifier, GPT_4O_MINI};
use jobs_core::Config;
use openai_client::OpenAIClient;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "enrich_jobs")]
#[command(about = "Classify stored job postings with an OpenAI model")]
struct Cli {
    /// Maximum number of postings to classify in this run
    #[arg(long, default_value_t = 100)]
    limit: i64,

    /// Classification requests in flight at once
    #[arg(long, default_value_t = 8)]
    concurrency: usize,

    #[arg(long, default_value = GPT_4O_MINI)]
    model: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobs_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(config.database.connect_options())
        .await
        .context("Failed to connect to database")?;

    let client = OpenAIClient::new(config.require_openai_api_key()?);
    let classifier = Arc::new(OpenAIJobClassifier::new(client, cli.model));

    let report = enrich_unenriched(&pool, classifier, cli.limit, cli.concurrency).await?;

    println!(
        "Classified {} postings with {}: {} input (~{} description) / {} output tokens, ${:.4}",
        report.classified,
        report.model,
        report.tokens.input_tokens,
        report.estimated_input_tokens,
        report.tokens.output_tokens,
        report.cost.total_cost
    );

    pool.close().await;
    Ok(())
}
