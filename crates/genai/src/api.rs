//! HTTP implementation of the content-generation adapter.
//!
//! Wraps the generation service's REST endpoint using [`reqwest`]: the
//! descriptor and context go out as JSON, the raw structured payload
//! comes back for typed parsing by the caller.

use async_trait::async_trait;
use modcraft_core::SectionDescriptor;

use crate::adapter::{ContentGenerator, GenerationContext, GenerationError};

/// HTTP client for a single generation-service instance.
pub struct HttpContentGenerator {
    client: reqwest::Client,
    api_url: String,
}

impl HttpContentGenerator {
    /// Create a new client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8700`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across pipeline invocations).
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }
}

#[async_trait]
impl ContentGenerator for HttpContentGenerator {
    async fn generate(
        &self,
        descriptor: &SectionDescriptor,
        context: &GenerationContext,
    ) -> Result<serde_json::Value, GenerationError> {
        let body = serde_json::json!({
            "section": descriptor,
            "context": {
                "prior_html": context.prior_html,
            },
        });

        let response = self
            .client
            .post(format!("{}/generate", self.api_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Service {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))
    }
}
