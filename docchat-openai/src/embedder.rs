//! OpenAI embeddings client.
//!
//! Calls the `api.openai.com` embeddings endpoint directly with `reqwest`,
//! authenticating via bearer token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use docchat_core::{ChatError, Embedder, Result};

/// The default OpenAI API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The default embedding model.
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
const DEFAULT_DIMENSIONS: usize = 1536;

const PROVIDER: &str = "OpenAI";

/// An OpenAI-backed [`Embedder`].
///
/// The alternative embedding path: a pipeline can embed here while
/// generating elsewhere, as long as ingestion and querying share one
/// embedder.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-3-small`.
/// - `dimensions` – optional Matryoshka truncation, sent as `dimensions`
///   in the request body.
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_openai::OpenAIEmbedder;
///
/// let embedder = OpenAIEmbedder::from_env()?.with_dimensions(512);
/// let embedding = embedder.embed("hello world").await?;
/// ```
pub struct OpenAIEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
    /// If set, passed to the API for Matryoshka truncation.
    request_dimensions: Option<usize>,
}

impl OpenAIEmbedder {
    /// Create a new embedder with the given API key and default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ChatError::InvalidArgument("API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
        })
    }

    /// Create a new embedder using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ChatError::InvalidArgument("OPENAI_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the embedding model (e.g. `text-embedding-3-large`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the output dimensions (Matryoshka truncation).
    ///
    /// This also updates the value returned by
    /// [`dimensions()`](Embedder::dimensions).
    pub fn with_dimensions(mut self, dims: usize) -> Self {
        self.dimensions = dims;
        self.request_dimensions = Some(dims);
        self
    }

    /// Override the API base URL (e.g. for a proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    /// One round trip to the embeddings endpoint, any number of inputs.
    async fn request_embeddings(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.request_dimensions,
        };

        let response = self
            .client
            .post(self.embeddings_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                embedding_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            error!(provider = PROVIDER, status = %response.status(), "API error");
            return Err(embedding_error(response_detail(response).await));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            embedding_error(format!("failed to parse response: {e}"))
        })?;

        Ok(parsed.vectors())
    }
}

fn embedding_error(message: impl Into<String>) -> ChatError {
    ChatError::Embedding { provider: PROVIDER.into(), message: message.into() }
}

/// Read a failed response body, preferring the API's structured message.
async fn response_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail =
        serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);
    format!("API returned {status}: {detail}")
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingResponse {
    /// Vectors in input order. Each row carries the index of the input it
    /// embeds, and callers zip vectors with inputs positionally, so order
    /// is restored here rather than assumed.
    fn vectors(mut self) -> Vec<Vec<f32>> {
        self.data.sort_by_key(|row| row.index);
        self.data.into_iter().map(|row| row.embedding).collect()
    }
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── Embedder implementation ────────────────────────────────────────

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let vectors = self.request_embeddings(&[text]).await?;
        vectors.into_iter().next().ok_or_else(|| embedding_error("API returned no embedding rows"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        self.request_embeddings(texts).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_api_key_is_rejected() {
        let err = OpenAIEmbedder::new("").map(|_| ()).unwrap_err();
        assert!(matches!(err, ChatError::InvalidArgument(_)));
    }

    #[test]
    fn default_model_and_dimensions() {
        let embedder = OpenAIEmbedder::new("sk-test").unwrap();
        assert_eq!(embedder.model, DEFAULT_MODEL);
        assert_eq!(embedder.dimensions(), DEFAULT_DIMENSIONS);
        assert_eq!(embedder.request_dimensions, None);
    }

    #[test]
    fn with_dimensions_updates_both_sides() {
        let embedder = OpenAIEmbedder::new("sk-test").unwrap().with_dimensions(512);
        assert_eq!(embedder.dimensions(), 512);
        assert_eq!(embedder.request_dimensions, Some(512));
    }

    #[test]
    fn embeddings_url_targets_the_configured_base() {
        let embedder =
            OpenAIEmbedder::new("sk-test").unwrap().with_base_url("http://localhost:8080/v1");
        assert_eq!(embedder.embeddings_url(), "http://localhost:8080/v1/embeddings");
    }

    #[test]
    fn request_includes_dimensions_only_when_set() {
        let with = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: &["a", "b"],
            dimensions: Some(512),
        };
        let value = serde_json::to_value(&with).unwrap();
        assert_eq!(
            value,
            json!({"model": "text-embedding-3-small", "input": ["a", "b"], "dimensions": 512})
        );

        let without =
            EmbeddingRequest { model: "text-embedding-3-small", input: &["a"], dimensions: None };
        let value = serde_json::to_value(&without).unwrap();
        assert!(value.get("dimensions").is_none());
    }

    #[test]
    fn response_vectors_come_back_in_input_order() {
        let json = json!({
            "object": "list",
            "data": [
                {"object": "embedding", "index": 1, "embedding": [1.0, 0.0]},
                {"object": "embedding", "index": 0, "embedding": [0.5, -0.5]}
            ],
            "model": "text-embedding-3-small",
            "usage": {"prompt_tokens": 4, "total_tokens": 4}
        });

        let resp: EmbeddingResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.vectors(), vec![vec![0.5, -0.5], vec![1.0, 0.0]]);
    }

    #[test]
    fn error_body_parses_structured_message() {
        let json = json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        });

        let resp: ErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(resp.error.message, "Incorrect API key provided");
    }

    #[tokio::test]
    async fn empty_batch_short_circuits_without_network() {
        let embedder = OpenAIEmbedder::new("sk-test").unwrap();
        let out = embedder.embed_batch(&[]).await.unwrap();
        assert!(out.is_empty());
    }
}
