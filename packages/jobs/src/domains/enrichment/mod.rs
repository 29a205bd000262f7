//! Enrichment domain - LLM classification of stored postings.
//!
//! Reads postings written by the jobs domain, maps each onto the role and
//! seniority taxonomy, and stores the structured result per `job_id`.

pub mod activities;
pub mod cost;
pub mod models;
pub mod prompts;
pub mod taxonomy;

pub use activities::enrich::{classify_all, enrich_unenriched, EnrichmentReport};
pub use cost::{calculate_cost, Cost, TokenTally};
pub use models::{Classification, JobExtraction, JobPostingExtraction, PostingForEnrichment};
pub use taxonomy::{JobTitle, Seniority};
