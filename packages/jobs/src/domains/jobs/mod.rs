//! Jobs domain - Adzuna postings and the recency-filtered ingestion run.

pub mod activities;
pub mod models;

pub use activities::ingest::{ingest_all, IngestionDriver, IngestionSummary, PageWindow};
pub use models::{AdzunaJob, AdzunaJobRow};
