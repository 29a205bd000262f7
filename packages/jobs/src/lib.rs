// Job Market Insights - ingestion and enrichment core
//
// Pulls recent postings from Adzuna into Postgres, then classifies them
// against a fixed data/AI/software role taxonomy with an LLM.
//
// External services sit behind the Base* traits in kernel/ so the
// pipelines in domains/ can be exercised with in-memory fakes.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
