//! Pull recent Adzuna postings for one or more job titles into Postgres.
//!
//! ```sh
//! adzuna_ingestion "data engineer" "data scientist" --pages 3
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use jobs_core::domains::jobs::{ingest_all, IngestionDriver};
use jobs_core::kernel::PostgresJobSink;
use jobs_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "adzuna_ingestion")]
#[command(about = "Fetch recent job postings from Adzuna and store them in Postgres")]
struct Cli {
    /// Job titles to search for, one query each
    #[arg(required = true)]
    job_titles: Vec<String>,

    /// Number of result pages to walk per job title
    #[arg(long, default_value_t = 1)]
    pages: u32,
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

    let driver = IngestionDriver::new(
        Arc::new(config.adzuna_client()),
        Arc::new(PostgresJobSink::new(config.database.clone())),
    )
    .with_start_page(config.start_page);

    let summary = ingest_all(&driver, &cli.job_titles, cli.pages).await?;

    tracing::info!(
        total_attempted = summary.total_attempted,
        terms = summary.terms_processed,
        "Ingestion finished"
    );

    Ok(())
}
