use std::sync::Arc;

use anyhow::{Context, Result};
use openai_client::truncate_to_char_boundary;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::common::map_progress;
use crate::domains::enrichment::cost::{calculate_cost, count_tokens_per_text, Cost, TokenTally};
use crate::domains::enrichment::models::{Classification, JobExtraction, PostingForEnrichment};
use crate::domains::enrichment::prompts::MAX_DESCRIPTION_BYTES;
use crate::kernel::BaseJobClassifier;

/// Outcome of one enrichment run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    pub model: String,
    pub classified: usize,
    /// Description tokens counted locally before classification.
    pub estimated_input_tokens: u64,
    pub tokens: TokenTally,
    pub cost: Cost,
}

/// Classify postings with bounded concurrency, keeping input order.
///
/// Every posting is attempted; if any classification failed, the first
/// failure (in input order) is returned and nothing is kept.
pub async fn classify_all(
    postings: Vec<PostingForEnrichment>,
    classifier: Arc<dyn BaseJobClassifier>,
    concurrency: usize,
) -> Result<Vec<(PostingForEnrichment, Classification)>> {
    let results = map_progress(postings, concurrency, |posting| {
        let classifier = classifier.clone();
        async move {
            let classification = classifier.classify(&posting).await;
            classification.map(|c| (posting, c))
        }
    })
    .await;

    results.into_iter().collect()
}

/// Local token count of the descriptions as they will be sent.
fn estimate_description_tokens(model: &str, postings: &[PostingForEnrichment]) -> Result<u64> {
    let descriptions: Vec<&str> = postings
        .iter()
        .map(|p| truncate_to_char_boundary(p.description.as_deref().unwrap_or_default(), MAX_DESCRIPTION_BYTES))
        .collect();

    let counts = count_tokens_per_text(model, &descriptions)?;
    Ok(counts.into_iter().map(|n| n as u64).sum())
}

/// Classify up to `limit` stored postings that have no extraction yet and
/// store the results.
///
/// All extractions of a run are written in one transaction: a failed
/// classification or a failed write leaves nothing behind.
pub async fn enrich_unenriched(
    pool: &PgPool,
    classifier: Arc<dyn BaseJobClassifier>,
    limit: i64,
    concurrency: usize,
) -> Result<EnrichmentReport> {
    let model = classifier.model().to_string();

    JobExtraction::ensure_table(pool)
        .await
        .context("Failed to create extraction tables")?;

    let postings = JobExtraction::find_unenriched(limit, pool)
        .await
        .context("Failed to load postings awaiting enrichment")?;

    if postings.is_empty() {
        info!("No postings awaiting enrichment");
        return Ok(EnrichmentReport {
            model,
            ..Default::default()
        });
    }

    let estimated_input_tokens = match estimate_description_tokens(&model, &postings) {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!(error = %e, "Could not count description tokens");
            0
        }
    };
    info!(
        count = postings.len(),
        model = %model,
        concurrency,
        estimated_input_tokens,
        estimated_input_cost = calculate_cost(&model, estimated_input_tokens, 0).input_cost,
        "Classifying postings"
    );

    let classified = classify_all(postings, classifier, concurrency).await?;

    let mut tx = pool.begin().await.context("Failed to open extraction transaction")?;
    let mut tokens = TokenTally::default();
    for (posting, classification) in &classified {
        JobExtraction::upsert(
            &posting.job_id,
            &classification.extraction,
            &model,
            classification.usage,
            &mut *tx,
        )
        .await
        .with_context(|| format!("Failed to store extraction for job {}", posting.job_id))?;
        tokens.record(classification.usage);
    }
    tx.commit().await.context("Failed to commit extractions")?;

    let cost = tokens.cost(&model);
    info!(
        classified = classified.len(),
        input_tokens = tokens.input_tokens,
        output_tokens = tokens.output_tokens,
        total_cost = cost.total_cost,
        "Enrichment complete"
    );

    Ok(EnrichmentReport {
        model,
        classified: classified.len(),
        estimated_input_tokens,
        tokens,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockJobClassifier;

    fn posting(job_id: &str) -> PostingForEnrichment {
        PostingForEnrichment {
            job_id: job_id.to_string(),
            company_display_name: Some("Acme".to_string()),
            title: Some("Data Engineer".to_string()),
            description: Some("Python and SQL".to_string()),
        }
    }

    #[test]
    fn estimate_counts_every_description() {
        let mut without_description = posting("2");
        without_description.description = None;

        let one = estimate_description_tokens("gpt-4o-mini", &[posting("1")]).unwrap();
        let both = estimate_description_tokens("gpt-4o-mini", &[posting("1"), without_description]).unwrap();

        assert!(one > 0);
        assert_eq!(one, both);
    }

    #[tokio::test]
    async fn classifies_every_posting_in_order() {
        let classifier = MockJobClassifier::new();
        let postings = vec![posting("1"), posting("2"), posting("3")];

        let classified = classify_all(postings, Arc::new(classifier.clone()), 2).await.unwrap();

        let ids: Vec<&str> = classified.iter().map(|(p, _)| p.job_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(classifier.calls().len(), 3);
    }

    #[tokio::test]
    async fn one_failure_fails_the_batch_after_all_attempts() {
        let classifier = MockJobClassifier::new().failing_for(&["2"]);
        let postings = vec![posting("1"), posting("2"), posting("3")];

        let result = classify_all(postings, Arc::new(classifier.clone()), 1).await;

        assert!(result.is_err());
        assert_eq!(classifier.calls(), vec!["1", "2", "3"]);
    }
}
