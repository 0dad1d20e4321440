//! Abstractions for generating abstractive summaries via local model providers.
//!
//! The model is optional; when no provider is configured the summarizer goes straight to its
//! deterministic extractive fallback. The Ollama-backed client issues HTTP requests directly to
//! the runtime and asks for greedy decoding so identical input yields identical output.

use crate::config::{Config, SummarizationProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced while attempting abstractive summarization.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// Provider was explicitly disabled or unreachable.
    #[error("Summarization provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Request payload passed to the summarization provider.
#[derive(Debug, Clone)]
pub struct SummarizationRequest {
    /// Fully qualified model identifier understood by the provider.
    pub model: String,
    /// Document text to summarize, already truncated to the model's input budget.
    pub text: String,
    /// Upper bound on generated tokens.
    pub max_length: usize,
    /// Lower bound on summary length requested from the model.
    pub min_length: usize,
}

/// Interface implemented by abstractive summarization providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Generate a summary of the request text using the configured model.
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError>;
}

/// Build the summarization client described by configuration.
///
/// Returns `Ok(None)` when summaries should always come from the extractive fallback.
pub fn build_summarization_client(
    config: &Config,
) -> Result<Option<Box<dyn SummarizationClient>>, SummarizationClientError> {
    match config.summarization_provider {
        SummarizationProvider::None => Ok(None),
        SummarizationProvider::Ollama => {
            let base_url = config
                .ollama_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            Ok(Some(Box::new(OllamaSummarizationClient::new(base_url)?)))
        }
    }
}

/// Ollama `/api/generate` adapter.
pub struct OllamaSummarizationClient {
    http: Client,
    base_url: String,
}

impl OllamaSummarizationClient {
    /// Create a client targeting the given Ollama base URL.
    pub fn new(base_url: String) -> Result<Self, SummarizationClientError> {
        let http = Client::builder()
            .user_agent("pdf-digest/summary")
            .build()
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to construct HTTP client: {error}"
                ))
            })?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

fn build_prompt(text: &str, min_length: usize) -> String {
    format!(
        "Summarize the following document in a single concise paragraph of at least {min_length} words. \
         Return only the summary.\n\n{text}"
    )
}

#[async_trait]
impl SummarizationClient for OllamaSummarizationClient {
    async fn generate_summary(
        &self,
        request: SummarizationRequest,
    ) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "model": request.model,
            "prompt": build_prompt(&request.text, request.min_length),
            "stream": false,
            "options": {
                // Greedy decoding with a pinned seed keeps summaries reproducible.
                "temperature": 0.0,
                "top_k": 1,
                "seed": 0,
                "num_predict": request.max_length,
            }
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummarizationClientError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(SummarizationClientError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode Ollama response: {error}"
            ))
        })?;

        if !body.done {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        let summary = body.response.trim();
        if summary.is_empty() {
            return Err(SummarizationClientError::InvalidResponse(
                "Ollama returned an empty summary".into(),
            ));
        }

        Ok(summary.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn request() -> SummarizationRequest {
        SummarizationRequest {
            model: "llama".into(),
            text: "A long document body.".into(),
            max_length: 4000,
            min_length: 30,
        }
    }

    #[tokio::test]
    async fn ollama_client_handles_successful_response() {
        let server = MockServer::start_async().await;
        let client = OllamaSummarizationClient::new(server.base_url()).expect("client");

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .json_body_partial(r#"{"stream": false, "options": {"num_predict": 4000}}"#);
                then.status(200).json_body(json!({
                    "response": "  Summary text\n",
                    "done": true
                }));
            })
            .await;

        let summary = client.generate_summary(request()).await.expect("summary");

        mock.assert();
        assert_eq!(summary, "Summary text");
    }

    #[tokio::test]
    async fn ollama_client_handles_error_status() {
        let server = MockServer::start_async().await;
        let client = OllamaSummarizationClient::new(server.base_url()).expect("client");

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("boom");
            })
            .await;

        let error = client
            .generate_summary(request())
            .await
            .expect_err("error response");

        assert!(
            matches!(error, SummarizationClientError::GenerationFailed(ref message) if message.contains("500"))
        );
    }

    #[tokio::test]
    async fn ollama_client_rejects_empty_summary() {
        let server = MockServer::start_async().await;
        let client = OllamaSummarizationClient::new(server.base_url()).expect("client");

        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .json_body(json!({ "response": "   ", "done": true }));
            })
            .await;

        let error = client
            .generate_summary(request())
            .await
            .expect_err("empty summary");
        assert!(matches!(error, SummarizationClientError::InvalidResponse(_)));
    }

    #[test]
    fn disabled_provider_builds_no_client() {
        let config = Config {
            summarization_provider: SummarizationProvider::None,
            ..Config::default()
        };
        let client = build_summarization_client(&config).expect("build");
        assert!(client.is_none());
    }

    #[test]
    fn default_config_builds_an_ollama_client() {
        let client = build_summarization_client(&Config::default()).expect("build");
        assert!(client.is_some());
    }
}
