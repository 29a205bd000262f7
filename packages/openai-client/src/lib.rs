//! Minimal OpenAI client for schema-constrained extraction.
//!
//! The response type drives everything: its `JsonSchema` derive becomes the
//! strict `response_format`, and the answer is deserialized back into it.
//!
//! ```rust,ignore
//! #[derive(Deserialize, JsonSchema)]
//! struct Classification {
//!     role: String,
//!     skills: Vec<String>,
//! }
//!
//! let client = OpenAIClient::new(api_key);
//! let extracted = client
//!     .extract::<Classification>("gpt-4o-mini", system_prompt, user_prompt)
//!     .await?;
//! println!("{} ({:?})", extracted.value.role, extracted.usage);
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::{
    strip_code_blocks, truncate_to_char_boundary, Extracted, ExtractionRequest, Message, Role, Usage,
};

use std::time::{Duration, Instant};

use tracing::{debug, warn};
use types::CompletionBody;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Per-request timeout, two minutes unless overridden.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send requests somewhere other than api.openai.com (Azure, proxies, fakes).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask `model` for a `T` and deserialize the answer.
    pub async fn extract<T: StructuredOutput>(
        &self,
        model: &str,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Result<Extracted<T>> {
        let request = ExtractionRequest::new(model, system_prompt, user_prompt, T::openai_schema())
            .with_schema_name(T::type_name());

        let (content, usage) = self.complete(&request).await?;

        let value = serde_json::from_str(strip_code_blocks(&content)).map_err(|e| OpenAIError::Parse {
            type_name: T::type_name(),
            message: e.to_string(),
        })?;

        Ok(Extracted { value, usage })
    }

    /// Send one request and return the answer text with its usage.
    pub async fn complete(&self, request: &ExtractionRequest) -> Result<(String, Option<Usage>)> {
        let start = Instant::now();

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = %status, model = %request.model, "OpenAI request rejected");
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: CompletionBody = serde_json::from_str(&body).map_err(|e| OpenAIError::Parse {
            type_name: "completion".to_string(),
            message: e.to_string(),
        })?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "OpenAI completion received"
        );

        parsed.into_answer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, schemars::JsonSchema)]
    #[allow(dead_code)]
    struct Answer {
        label: String,
    }

    #[test]
    fn base_url_can_be_overridden() {
        let client = OpenAIClient::new("sk-test").with_base_url("https://proxy.internal/v1");
        assert_eq!(client.base_url(), "https://proxy.internal/v1");
        assert_eq!(OpenAIClient::new("sk-test").base_url(), DEFAULT_BASE_URL);
    }

    #[tokio::test]
    async fn silent_server_hits_the_request_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client = OpenAIClient::new("sk-test")
            .with_base_url(format!("http://{}", addr))
            .with_timeout(Duration::from_millis(200));
        let err = client
            .extract::<Answer>("gpt-4o-mini", "system", "user")
            .await
            .unwrap_err();

        assert!(matches!(err, OpenAIError::Network(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client = OpenAIClient::new("sk-test").with_base_url("http://127.0.0.1:1");
        let err = client
            .extract::<Answer>("gpt-4o-mini", "system", "user")
            .await
            .unwrap_err();

        assert!(matches!(err, OpenAIError::Network(_)));
    }
}
