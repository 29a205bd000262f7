//! Test fixtures for creating test data.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A job id no other test in this run will use.
pub fn unique_job_id(tag: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{}-{}-{}", tag, nanos, NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Adzuna-shaped posting with every persisted field populated.
pub fn raw_posting(job_id: &str, created: DateTime<Utc>) -> Value {
    json!({
        "id": job_id,
        "title": "Senior Data Engineer",
        "description": "Build pipelines with Python, Spark and dbt.",
        "created": created.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        "redirect_url": format!("https://www.adzuna.be/details/{}", job_id),
        "company": { "display_name": "Acme Logistics" },
        "location": { "display_name": "Gent, Oost-Vlaanderen" },
        "latitude": 51.05,
        "longitude": 3.72,
        "category": { "tag": "it-jobs" },
        "contract_time": "full_time"
    })
}

/// Posting created `days` days before now.
pub fn posting_days_old(job_id: &str, days: i64) -> Value {
    raw_posting(job_id, Utc::now() - Duration::days(days))
}
