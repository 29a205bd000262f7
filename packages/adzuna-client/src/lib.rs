//! Pure Adzuna job search REST API client.
//!
//! A minimal client for the Adzuna `jobs/{country}/search/{page}` endpoint.
//! Postings come back as [`RawJob`] values since the provider omits fields
//! freely; read them with the [`Field`] lookup helper.
//!
//! # Example
//!
//! ```rust,ignore
//! use adzuna_client::AdzunaClient;
//!
//! let client = AdzunaClient::new("app-id", "app-key");
//!
//! let page = client.search("data engineer", 1).await?;
//! for job in page.results() {
//!     println!("{}", job.field("title").text().unwrap_or_default());
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{AdzunaError, Result};
pub use types::{Field, RawJob, SearchParams, SearchResponse};

use std::time::Duration;

const BASE_URL: &str = "https://api.adzuna.com/v1/api/jobs";

pub const DEFAULT_COUNTRY: &str = "be";
pub const DEFAULT_RESULTS_PER_PAGE: u32 = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AdzunaClient {
    client: reqwest::Client,
    app_id: String,
    app_key: String,
    base_url: String,
    country: String,
    results_per_page: u32,
    timeout: Duration,
}

impl AdzunaClient {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            app_id: app_id.into(),
            app_key: app_key.into(),
            base_url: BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            results_per_page: DEFAULT_RESULTS_PER_PAGE,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Market to search (`be`, `gb`, `nl`, ...).
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_results_per_page(mut self, results_per_page: u32) -> Self {
        self.results_per_page = results_per_page;
        self
    }

    /// Point at a different host (proxies, local fakes).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request timeout, 30 seconds unless overridden.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn results_per_page(&self) -> u32 {
        self.results_per_page
    }

    /// URL of one 1-based results page, without query parameters.
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}/{}/search/{}",
            self.base_url.trim_end_matches('/'),
            self.country,
            page
        )
    }

    fn params<'a>(&'a self, what: &'a str) -> SearchParams<'a> {
        SearchParams {
            app_id: &self.app_id,
            app_key: &self.app_key,
            results_per_page: self.results_per_page,
            what,
            sort_by: "date",
        }
    }

    /// Fetch one page of postings matching `what`, newest first.
    pub async fn search(&self, what: &str, page: u32) -> Result<SearchResponse> {
        let url = self.page_url(page);
        tracing::info!(url = %url, what, page, "Requesting Adzuna page");

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(&self.params(what))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdzunaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = resp.text().await?;
        let page_data: SearchResponse =
            serde_json::from_str(&body).map_err(|e| AdzunaError::Parse(e.to_string()))?;

        tracing::debug!(
            what,
            page,
            results = page_data.results().len(),
            count = ?page_data.count,
            "Adzuna page received"
        );

        Ok(page_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_uses_country_and_page() {
        let client = AdzunaClient::new("id", "key");
        assert_eq!(
            client.page_url(3),
            "https://api.adzuna.com/v1/api/jobs/be/search/3"
        );
    }

    #[test]
    fn builder_overrides_defaults() {
        let client = AdzunaClient::new("id", "key")
            .with_country("nl")
            .with_results_per_page(20)
            .with_base_url("http://localhost:9999/jobs/");

        assert_eq!(client.country(), "nl");
        assert_eq!(client.results_per_page(), 20);
        assert_eq!(client.page_url(1), "http://localhost:9999/jobs/nl/search/1");
    }

    #[test]
    fn params_request_date_sort() {
        let client = AdzunaClient::new("id", "key");
        let params = serde_json::to_value(client.params("data engineer")).unwrap();

        assert_eq!(params["app_id"], "id");
        assert_eq!(params["app_key"], "key");
        assert_eq!(params["results_per_page"], 50);
        assert_eq!(params["what"], "data engineer");
        assert_eq!(params["sort_by"], "date");
    }

    #[tokio::test]
    async fn silent_server_hits_the_request_timeout() {
        // Bound but never accepting: the connection opens, no response ever comes
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = AdzunaClient::new("id", "key")
            .with_base_url(format!("http://{}", addr))
            .with_timeout(Duration::from_millis(200));
        let err = client.search("data engineer", 1).await.unwrap_err();

        assert!(matches!(err, AdzunaError::Network(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client = AdzunaClient::new("id", "key").with_base_url("http://127.0.0.1:1");
        let err = client.search("data engineer", 1).await.unwrap_err();
        assert!(matches!(err, AdzunaError::Network(_)));
    }
}
