//! OpenAI adapter for [`BaseJobClassifier`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use openai_client::OpenAIClient;

use super::BaseJobClassifier;
use crate::domains::enrichment::models::{Classification, JobPostingExtraction, PostingForEnrichment};
use crate::domains::enrichment::prompts::{build_user_prompt, system_prompt};

#[derive(Clone)]
pub struct OpenAIJobClassifier {
    client: OpenAIClient,
    model: String,
    system_prompt: String,
}

impl OpenAIJobClassifier {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: system_prompt(),
        }
    }
}

#[async_trait]
impl BaseJobClassifier for OpenAIJobClassifier {
    async fn classify(&self, posting: &PostingForEnrichment) -> Result<Classification> {
        let user_prompt = build_user_prompt(
            posting.company_display_name.as_deref(),
            posting.title.as_deref(),
            posting.description.as_deref(),
        );

        let extracted = self
            .client
            .extract::<JobPostingExtraction>(&self.model, &self.system_prompt, user_prompt)
            .await
            .with_context(|| format!("Failed to classify job {}", posting.job_id))?;

        Ok(Classification {
            extraction: extracted.value.normalized(),
            usage: extracted.usage,
        })
    }

    fn model(&self) -> &str {
        &self.model
    }
}
