use anyhow::Result;
use chrono::{DateTime, Utc};
use openai_client::Usage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::domains::enrichment::taxonomy::{JobTitle, Seniority};
use crate::domains::jobs::models::AdzunaJob;

pub const CREATE_EXTRACTIONS_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS adzuna_job_extractions (
    job_id TEXT PRIMARY KEY REFERENCES adzuna_jobs (job_id),
    job_title TEXT NOT NULL,
    seniority TEXT NOT NULL,
    clean_title TEXT NOT NULL,
    skills TEXT[] NOT NULL,
    job_description_summary TEXT NOT NULL,
    company_description TEXT NOT NULL,
    company_description_confidence_score DOUBLE PRECISION NOT NULL,
    model TEXT NOT NULL,
    input_tokens INTEGER,
    output_tokens INTEGER,
    extracted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

// ── LLM Structured Output ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JobPostingExtraction {
    /// One of the predefined job titles listed.
    pub job_title: JobTitle,
    /// Seniority inferred from the job title/description; use 'unknown' if unclear.
    pub seniority: Seniority,
    /// Normalized title without location/contract/remote tags (e.g., 'Senior Data Engineer').
    pub clean_title: String,
    /// Skills, tools, and technologies explicitly mentioned (e.g., 'python', 'sql', 'aws').
    #[serde(default)]
    pub skills: Vec<String>,
    /// 3-5 sentence summary of the job description.
    pub job_description_summary: String,
    /// 3-5 sentence description of what the company does.
    pub company_description: String,
    /// Confidence between 0.0 and 1.0 that the company description is accurate.
    #[schemars(range(min = 0.0, max = 1.0))]
    pub company_description_confidence_score: f64,
}

impl JobPostingExtraction {
    /// Tidy a model answer: trimmed text, deduplicated lowercase skills,
    /// confidence clamped into [0, 1] (NaN becomes 0).
    pub fn normalized(mut self) -> Self {
        self.clean_title = self.clean_title.trim().to_string();
        self.job_description_summary = self.job_description_summary.trim().to_string();
        self.company_description = self.company_description.trim().to_string();

        let mut skills: Vec<String> = Vec::with_capacity(self.skills.len());
        for skill in self.skills.iter().map(|s| s.trim().to_lowercase()) {
            if !skill.is_empty() && !skills.contains(&skill) {
                skills.push(skill);
            }
        }
        self.skills = skills;

        let score = self.company_description_confidence_score;
        self.company_description_confidence_score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };

        self
    }
}

/// What the classifier returns for one posting.
#[derive(Debug, Clone)]
pub struct Classification {
    pub extraction: JobPostingExtraction,
    pub usage: Option<Usage>,
}

// ── Stored Rows ─────────────────────────────────────────────────────────────

/// The slice of a stored posting the classifier needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostingForEnrichment {
    pub job_id: String,
    pub company_display_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobExtraction {
    pub job_id: String,
    pub job_title: String,
    pub seniority: String,
    pub clean_title: String,
    pub skills: Vec<String>,
    pub job_description_summary: String,
    pub company_description: String,
    pub company_description_confidence_score: f64,
    pub model: String,
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub extracted_at: DateTime<Utc>,
}

impl JobExtraction {
    pub fn job_title(&self) -> JobTitle {
        JobTitle::from_label(&self.job_title)
    }

    pub fn seniority(&self) -> Seniority {
        Seniority::from_label(&self.seniority)
    }

    /// Create the postings and extractions tables if missing.
    pub async fn ensure_table(pool: &PgPool) -> Result<()> {
        let mut conn = pool.acquire().await?;
        AdzunaJob::ensure_table(&mut *conn).await?;
        sqlx::query(CREATE_EXTRACTIONS_TABLE_SQL)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Stored postings that have not been classified yet, oldest first.
    pub async fn find_unenriched(limit: i64, pool: &PgPool) -> Result<Vec<PostingForEnrichment>> {
        let postings = sqlx::query_as::<_, PostingForEnrichment>(
            "SELECT j.job_id, j.company_display_name, j.title, j.description
             FROM adzuna_jobs j
             LEFT JOIN adzuna_job_extractions e ON e.job_id = j.job_id
             WHERE e.job_id IS NULL
             ORDER BY j.id
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(postings)
    }

    /// Store an extraction, replacing any earlier one for the same posting.
    ///
    /// Takes any executor so a whole run can be written in one transaction.
    pub async fn upsert<'e, E>(
        job_id: &str,
        extraction: &JobPostingExtraction,
        model: &str,
        usage: Option<Usage>,
        executor: E,
    ) -> Result<Self>
    where
        E: PgExecutor<'e>,
    {
        let stored = sqlx::query_as::<_, JobExtraction>(
            "INSERT INTO adzuna_job_extractions (
                job_id, job_title, seniority, clean_title, skills,
                job_description_summary, company_description,
                company_description_confidence_score, model, input_tokens, output_tokens
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (job_id) DO UPDATE SET
                job_title = EXCLUDED.job_title,
                seniority = EXCLUDED.seniority,
                clean_title = EXCLUDED.clean_title,
                skills = EXCLUDED.skills,
                job_description_summary = EXCLUDED.job_description_summary,
                company_description = EXCLUDED.company_description,
                company_description_confidence_score = EXCLUDED.company_description_confidence_score,
                model = EXCLUDED.model,
                input_tokens = EXCLUDED.input_tokens,
                output_tokens = EXCLUDED.output_tokens,
                extracted_at = NOW()
             RETURNING *",
        )
        .bind(job_id)
        .bind(extraction.job_title.as_str())
        .bind(extraction.seniority.as_str())
        .bind(&extraction.clean_title)
        .bind(&extraction.skills)
        .bind(&extraction.job_description_summary)
        .bind(&extraction.company_description)
        .bind(extraction.company_description_confidence_score)
        .bind(model)
        .bind(usage.map(|u| u.prompt_tokens as i32))
        .bind(usage.map(|u| u.completion_tokens as i32))
        .fetch_one(executor)
        .await?;

        Ok(stored)
    }

    pub async fn find_by_job_id(job_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        let extraction = sqlx::query_as::<_, JobExtraction>(
            "SELECT * FROM adzuna_job_extractions WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

        Ok(extraction)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM adzuna_job_extractions")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
