//! Adzuna adapter for [`BaseJobSource`].

use adzuna_client::{AdzunaClient, SearchResponse};
use async_trait::async_trait;
use tracing::error;

use super::BaseJobSource;

#[async_trait]
impl BaseJobSource for AdzunaClient {
    async fn fetch_page(&self, what: &str, page: u32) -> Option<SearchResponse> {
        match self.search(what, page).await {
            Ok(data) => Some(data),
            Err(e) => {
                error!(what, page, error = %e, "Request failed");
                None
            }
        }
    }
}
