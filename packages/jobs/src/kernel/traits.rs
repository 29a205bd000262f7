// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// The ingestion driver and the enrichment activity depend on these,
// never on reqwest, sqlx, or the OpenAI client directly.
//
// Naming convention: Base* for trait names (e.g., BaseJobSource, BaseJobSink)

use adzuna_client::{RawJob, SearchResponse};
use anyhow::Result;
use async_trait::async_trait;

use crate::domains::enrichment::models::{Classification, PostingForEnrichment};

// =============================================================================
// Job Source Trait (Infrastructure - paginated job search API)
// =============================================================================

#[async_trait]
pub trait BaseJobSource: Send + Sync {
    /// Fetch one 1-based page of postings for `what`, newest first.
    ///
    /// Returns `None` when the page could not be fetched. Implementations
    /// log the failure themselves; callers skip the page and move on.
    async fn fetch_page(&self, what: &str, page: u32) -> Option<SearchResponse>;
}

// =============================================================================
// Job Sink Trait (Infrastructure - durable posting store)
// =============================================================================

#[async_trait]
pub trait BaseJobSink: Send + Sync {
    /// Persist a batch of postings atomically, ignoring ones already stored.
    ///
    /// Returns the number of rows attempted, which counts duplicates the
    /// store silently dropped.
    async fn persist(&self, jobs: &[RawJob]) -> Result<usize>;
}

// =============================================================================
// Job Classifier Trait (Infrastructure - LLM structured extraction)
// =============================================================================

#[async_trait]
pub trait BaseJobClassifier: Send + Sync {
    /// Classify one posting into the role taxonomy.
    async fn classify(&self, posting: &PostingForEnrichment) -> Result<Classification>;

    /// Model identifier recorded alongside each extraction.
    fn model(&self) -> &str;
}
