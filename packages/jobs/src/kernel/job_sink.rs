//! Postgres adapter for [`BaseJobSink`].

use adzuna_client::RawJob;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use tracing::info;

use super::BaseJobSink;
use crate::config::DatabaseConfig;
use crate::domains::jobs::models::{AdzunaJob, AdzunaJobRow};

/// Writes posting batches to `adzuna_jobs`.
///
/// Each call opens its own connection and transaction. Every mapped row is
/// bound, so a posting without an id trips the NOT NULL key and the whole
/// batch rolls back.
#[derive(Debug, Clone)]
pub struct PostgresJobSink {
    database: DatabaseConfig,
}

impl PostgresJobSink {
    pub fn new(database: DatabaseConfig) -> Self {
        Self { database }
    }
}

#[async_trait]
impl BaseJobSink for PostgresJobSink {
    async fn persist(&self, jobs: &[RawJob]) -> Result<usize> {
        if jobs.is_empty() {
            return Ok(0);
        }

        let rows: Vec<AdzunaJobRow> = jobs.iter().map(AdzunaJobRow::from_raw).collect();

        let mut conn = PgConnection::connect_with(&self.database.connect_options())
            .await
            .context("Failed to connect to database")?;

        let mut tx = conn.begin().await?;
        AdzunaJob::ensure_table(&mut *tx)
            .await
            .context("Failed to create adzuna_jobs table")?;
        let inserted = AdzunaJob::insert_rows(&rows, &mut *tx)
            .await
            .context("Failed to insert jobs")?;
        tx.commit().await.context("Failed to commit job batch")?;

        conn.close().await?;

        info!(attempted = rows.len(), inserted, "Inserted jobs");
        Ok(rows.len())
    }
}
