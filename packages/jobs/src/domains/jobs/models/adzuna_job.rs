use adzuna_client::RawJob;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

/// Idempotent DDL for the postings table. `job_id` is the key; `id` only
/// records insertion order.
pub const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS adzuna_jobs (
    id BIGSERIAL UNIQUE,
    job_id TEXT PRIMARY KEY NOT NULL,
    company_display_name TEXT,
    location TEXT,
    title TEXT,
    latitude DECIMAL,
    longitude DECIMAL,
    redirect_url TEXT,
    description TEXT,
    category_tag TEXT,
    contract_time TEXT,
    created TEXT
)
"#;

/// Upsert-ignore insert: a `job_id` already stored is silently skipped.
pub const INSERT_SQL: &str = r#"
INSERT INTO adzuna_jobs (
    job_id,
    company_display_name,
    location,
    title,
    latitude,
    longitude,
    redirect_url,
    description,
    category_tag,
    contract_time,
    created
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
ON CONFLICT (job_id) DO NOTHING
"#;

const SELECT_COLUMNS: &str = "id, job_id, company_display_name, location, title, \
     latitude::float8 AS latitude, longitude::float8 AS longitude, redirect_url, \
     description, category_tag, contract_time, created";

/// One posting projected onto the `adzuna_jobs` columns, in insert order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdzunaJobRow {
    pub job_id: Option<String>,
    pub company_display_name: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub redirect_url: Option<String>,
    pub description: Option<String>,
    pub category_tag: Option<String>,
    pub contract_time: Option<String>,
    pub created: Option<String>,
}

impl AdzunaJobRow {
    /// Column names in the order [`INSERT_SQL`] binds them.
    pub const COLUMNS: [&'static str; 11] = [
        "job_id",
        "company_display_name",
        "location",
        "title",
        "latitude",
        "longitude",
        "redirect_url",
        "description",
        "category_tag",
        "contract_time",
        "created",
    ];

    /// Project a raw posting onto the table columns.
    ///
    /// Never fails: anything missing or oddly shaped becomes `None`.
    pub fn from_raw(job: &RawJob) -> Self {
        Self {
            job_id: job.field("id").text(),
            company_display_name: job.field("company").get("display_name").text(),
            location: job.field("location").get("display_name").text(),
            title: job.field("title").text(),
            latitude: job.field("latitude").number(),
            longitude: job.field("longitude").number(),
            redirect_url: job.field("redirect_url").text(),
            description: job.field("description").text(),
            category_tag: job.field("category").get("tag").text(),
            contract_time: job.field("contract_time").text(),
            created: job.field("created").text(),
        }
    }
}

/// A stored posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdzunaJob {
    pub id: i64,
    pub job_id: String,
    pub company_display_name: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub redirect_url: Option<String>,
    pub description: Option<String>,
    pub category_tag: Option<String>,
    pub contract_time: Option<String>,
    pub created: Option<String>,
}

impl AdzunaJob {
    /// Create the table if it does not exist yet.
    pub async fn ensure_table(conn: &mut PgConnection) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(conn).await?;
        Ok(())
    }

    /// Insert rows one statement each, skipping `job_id`s already stored.
    ///
    /// A row without a `job_id` fails the NOT NULL primary key.
    pub async fn insert_rows(rows: &[AdzunaJobRow], conn: &mut PgConnection) -> Result<u64> {
        let mut inserted = 0;
        for row in rows {
            let result = sqlx::query(INSERT_SQL)
                .bind(&row.job_id)
                .bind(&row.company_display_name)
                .bind(&row.location)
                .bind(&row.title)
                .bind(row.latitude)
                .bind(row.longitude)
                .bind(&row.redirect_url)
                .bind(&row.description)
                .bind(&row.category_tag)
                .bind(&row.contract_time)
                .bind(&row.created)
                .execute(&mut *conn)
                .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    pub async fn find_by_job_id(job_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        let job = sqlx::query_as::<_, AdzunaJob>(&format!(
            "SELECT {} FROM adzuna_jobs WHERE job_id = $1",
            SELECT_COLUMNS
        ))
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

        Ok(job)
    }

    /// All stored postings in insertion order.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let jobs = sqlx::query_as::<_, AdzunaJob>(&format!(
            "SELECT {} FROM adzuna_jobs ORDER BY id",
            SELECT_COLUMNS
        ))
        .fetch_all(pool)
        .await?;

        Ok(jobs)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM adzuna_jobs")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
