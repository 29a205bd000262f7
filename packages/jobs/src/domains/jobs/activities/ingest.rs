//! Recency-filtered pagination over the job source.
//!
//! Adzuna returns postings newest first when asked to sort by date. A run
//! walks pages in order, keeps postings created within the last year, and
//! stops as soon as a page has nothing recent left: every later page is
//! older still.

use std::ops::Range;
use std::sync::Arc;

use adzuna_client::RawJob;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::common::timestamps::parse_created;
use crate::kernel::{BaseJobSink, BaseJobSource};

/// First page requested for every term. Earlier pages are never seen.
pub const DEFAULT_START_PAGE: u32 = 100;

/// Postings older than this, relative to the start of a term's run, are stale.
pub const RECENCY_WINDOW_DAYS: i64 = 365;

/// The cutoff for a run starting at `now`. Postings created at or after it are fresh.
pub fn recency_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(RECENCY_WINDOW_DAYS)
}

/// Consecutive pages requested for one term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    start: u32,
    count: u32,
}

impl PageWindow {
    pub fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last page requested, inclusive. `None` for an empty window.
    pub fn end(&self) -> Option<u32> {
        (self.count > 0).then(|| self.start.saturating_add(self.count - 1))
    }

    pub fn pages(&self) -> Range<u32> {
        self.start..self.start.saturating_add(self.count)
    }
}

/// The fresh prefix of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageScan {
    pub fresh: Vec<RawJob>,
    /// Postings passed over for a missing or unparseable `created`.
    pub skipped: usize,
    /// A stale posting ended the scan before the end of the page.
    pub hit_stale: bool,
}

/// Collect fresh postings from a newest-first page.
///
/// Scanning stops at the first posting older than `cutoff`; nothing after
/// it is examined, even postings that would pass on their own. Postings
/// without a usable timestamp are skipped and scanning continues.
pub fn scan_page(results: &[RawJob], cutoff: DateTime<Utc>) -> PageScan {
    let mut scan = PageScan::default();

    for job in results {
        let created = match parse_created(job.created()) {
            Ok(created) => created,
            Err(reason) => {
                debug!(job_id = ?job.field("id").text(), %reason, "Skipping posting");
                scan.skipped += 1;
                continue;
            }
        };

        if created < cutoff {
            scan.hit_stale = true;
            break;
        }
        scan.fresh.push(job.clone());
    }

    scan
}

/// Totals for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestionSummary {
    pub total_attempted: usize,
    pub terms_processed: usize,
}

pub struct IngestionDriver {
    source: Arc<dyn BaseJobSource>,
    sink: Arc<dyn BaseJobSink>,
    start_page: u32,
}

impl IngestionDriver {
    pub fn new(source: Arc<dyn BaseJobSource>, sink: Arc<dyn BaseJobSink>) -> Self {
        Self {
            source,
            sink,
            start_page: DEFAULT_START_PAGE,
        }
    }

    pub fn with_start_page(mut self, start_page: u32) -> Self {
        self.start_page = start_page;
        self
    }

    pub fn window(&self, pages: u32) -> PageWindow {
        PageWindow::new(self.start_page, pages)
    }

    /// Ingest up to `pages` pages for one term. Returns rows attempted.
    pub async fn ingest_term(&self, what: &str, pages: u32) -> Result<usize> {
        self.ingest_term_at(what, pages, Utc::now()).await
    }

    /// [`Self::ingest_term`] with an explicit clock. The cutoff is fixed
    /// from `now` for every page of the run.
    pub async fn ingest_term_at(&self, what: &str, pages: u32, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = recency_cutoff(now);
        let window = self.window(pages);
        let mut total = 0;

        debug!(what, start = window.start(), end = ?window.end(), %cutoff, "Starting term");

        for page in window.pages() {
            let Some(data) = self.source.fetch_page(what, page).await else {
                continue;
            };

            let scan = scan_page(data.results(), cutoff);
            debug!(
                what,
                page,
                received = data.results().len(),
                fresh = scan.fresh.len(),
                skipped = scan.skipped,
                hit_stale = scan.hit_stale,
                "Scanned page"
            );

            if scan.fresh.is_empty() {
                info!(what, page, %cutoff, "No jobs newer than cutoff; stopping");
                break;
            }

            total += self.sink.persist(&scan.fresh).await?;
        }

        Ok(total)
    }
}

/// Run every term in order and report the combined total.
///
/// A persistence error aborts the run; batches committed before it stay.
pub async fn ingest_all(driver: &IngestionDriver, terms: &[String], pages: u32) -> Result<IngestionSummary> {
    let mut summary = IngestionSummary::default();

    for term in terms {
        info!(what = %term, "Fetching jobs for job title");
        summary.total_attempted += driver.ingest_term(term, pages).await?;
        summary.terms_processed += 1;
    }

    info!(
        total = summary.total_attempted,
        queries = summary.terms_processed,
        "Completed importing {} jobs across {} queries",
        summary.total_attempted,
        summary.terms_processed
    );

    Ok(summary)
}
