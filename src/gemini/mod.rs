//! Gemini generation service
//!
//! [`GuideGenerator`] is the network boundary of the crate. [`GeminiClient`]
//! implements it against the Generative Language REST API; tests substitute
//! their own implementations.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::GeminiConfig;

pub mod types;

pub use types::{GenerateContentRequest, GenerateContentResponse};

/// Something that can answer a `generateContent` request
#[async_trait]
pub trait GuideGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse>;
}

/// HTTP client for the Gemini API
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: &GeminiConfig, api_key: &str) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!("TravelSynth/", env!("CARGO_PKG_VERSION")));
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(u64::from(config.timeout_seconds)));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl GuideGenerator for GeminiClient {
    #[instrument(name = "gemini_generate", skip_all, fields(model = %self.model))]
    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        debug!("Calling the Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .context("Gemini request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {status}: {body}"));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        debug!(candidates = parsed.candidates.len(), "Gemini response received");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let config = GeminiConfig {
            base_url: "http://localhost:9000/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            ..GeminiConfig::default()
        };
        let client = GeminiClient::new(&config, "key").unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9000/v1beta/models/gemini-test:generateContent"
        );
    }
}
