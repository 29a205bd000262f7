// Mock implementations of the Base* traits for tests
//
// Each mock records the calls it receives so tests can assert on the
// exact sequence of pages fetched, batches persisted, or postings classified.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use adzuna_client::{RawJob, SearchResponse};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use openai_client::Usage;

use super::{BaseJobClassifier, BaseJobSink, BaseJobSource};
use crate::domains::enrichment::models::{Classification, JobPostingExtraction, PostingForEnrichment};
use crate::domains::enrichment::taxonomy::{JobTitle, Seniority};

// =============================================================================
// Mock Job Source
// =============================================================================

/// Serves scripted pages. Pages never scripted behave like failed fetches.
#[derive(Clone, Default)]
pub struct MockJobSource {
    pages: Arc<Mutex<HashMap<u32, SearchResponse>>>,
    calls: Arc<Mutex<Vec<(String, u32)>>>,
}

impl MockJobSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: u32, results: Vec<serde_json::Value>) -> Self {
        let response = SearchResponse::new(results.into_iter().map(RawJob::new).collect());
        self.pages.lock().unwrap().insert(page, response);
        self
    }

    /// `(what, page)` for every fetch, in call order.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.calls().into_iter().map(|(_, page)| page).collect()
    }
}

#[async_trait]
impl BaseJobSource for MockJobSource {
    async fn fetch_page(&self, what: &str, page: u32) -> Option<SearchResponse> {
        self.calls.lock().unwrap().push((what.to_string(), page));
        self.pages.lock().unwrap().get(&page).cloned()
    }
}

// =============================================================================
// Mock Job Sink
// =============================================================================

#[derive(Clone, Default)]
pub struct MockJobSink {
    batches: Arc<Mutex<Vec<Vec<RawJob>>>>,
    fail: bool,
}

impl MockJobSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `persist` call returns an error, like a refused connection.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<RawJob>> {
        self.batches.lock().unwrap().clone()
    }

    /// `id` of every persisted posting, across all batches, in order.
    pub fn persisted_ids(&self) -> Vec<String> {
        self.batches()
            .iter()
            .flatten()
            .filter_map(|job| job.field("id").text())
            .collect()
    }
}

#[async_trait]
impl BaseJobSink for MockJobSink {
    async fn persist(&self, jobs: &[RawJob]) -> Result<usize> {
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        self.batches.lock().unwrap().push(jobs.to_vec());
        Ok(jobs.len())
    }
}

// =============================================================================
// Mock Job Classifier
// =============================================================================

#[derive(Clone)]
pub struct MockJobClassifier {
    extraction: JobPostingExtraction,
    usage: Usage,
    failing_job_ids: Arc<HashSet<String>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockJobClassifier {
    fn default() -> Self {
        Self {
            extraction: JobPostingExtraction {
                job_title: JobTitle::DataEngineer,
                seniority: Seniority::Senior,
                clean_title: "Senior Data Engineer".to_string(),
                skills: vec!["python".to_string(), "sql".to_string()],
                job_description_summary: "Builds batch and streaming pipelines.".to_string(),
                company_description: "A logistics company operating across Benelux.".to_string(),
                company_description_confidence_score: 0.8,
            },
            usage: Usage {
                prompt_tokens: 1_000,
                completion_tokens: 200,
                total_tokens: 1_200,
            },
            failing_job_ids: Arc::new(HashSet::new()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockJobClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extraction(mut self, extraction: JobPostingExtraction) -> Self {
        self.extraction = extraction;
        self
    }

    /// Classification of these postings fails, like an API error.
    pub fn failing_for(mut self, job_ids: &[&str]) -> Self {
        self.failing_job_ids = Arc::new(job_ids.iter().map(|id| id.to_string()).collect());
        self
    }

    /// `job_id` of every posting classified, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseJobClassifier for MockJobClassifier {
    async fn classify(&self, posting: &PostingForEnrichment) -> Result<Classification> {
        self.calls.lock().unwrap().push(posting.job_id.clone());

        if self.failing_job_ids.contains(&posting.job_id) {
            return Err(anyhow!("classification failed for {}", posting.job_id));
        }

        Ok(Classification {
            extraction: self.extraction.clone(),
            usage: Some(self.usage),
        })
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
