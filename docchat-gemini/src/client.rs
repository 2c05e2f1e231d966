//! Gemini REST client for embeddings and answer generation.
//!
//! Calls the `generativelanguage.googleapis.com` endpoints directly with
//! `reqwest`, authenticating via the `x-goog-api-key` header. Streaming
//! generation uses the SSE variant of `streamGenerateContent`.

use async_stream::stream;
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use docchat_core::{CancelToken, ChatError, Embedder, Result, TextGenerator, TokenStream};

/// The default Gemini API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default model for answer generation.
const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";

/// The default model for embeddings.
const DEFAULT_EMBEDDING_MODEL: &str = "gemini-embedding-001";

/// The default dimensionality for `gemini-embedding-001`.
const DEFAULT_DIMENSIONS: usize = 3072;

const PROVIDER: &str = "Gemini";

/// A Gemini-backed [`Embedder`] and [`TextGenerator`].
///
/// One client serves both roles so a pipeline can share a single HTTP
/// connection pool and API key across embedding and generation calls.
///
/// # Configuration
///
/// - `generation_model` – defaults to `gemini-2.5-flash`.
/// - `embedding_model` – defaults to `gemini-embedding-001`.
/// - `dimensions` – optional output truncation (`outputDimensionality`).
/// - `api_key` – from the constructor or the `GOOGLE_API_KEY` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_gemini::GeminiClient;
///
/// let client = GeminiClient::from_env()?;
/// let embedding = client.embed("hello world").await?;
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    generation_model: String,
    embedding_model: String,
    dimensions: usize,
    /// If set, passed to the API for output truncation.
    request_dimensions: Option<usize>,
}

impl GeminiClient {
    /// Create a new client with the given API key and default models.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ChatError::InvalidArgument("API key must not be empty".into()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            generation_model: DEFAULT_GENERATION_MODEL.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            request_dimensions: None,
        })
    }

    /// Create a new client using the `GOOGLE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| {
            ChatError::InvalidArgument("GOOGLE_API_KEY environment variable not set".into())
        })?;
        Self::new(api_key)
    }

    /// Set the model used for answer generation.
    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = model.into();
        self
    }

    /// Set the model used for embeddings.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the output dimensionality (truncates the embedding vector).
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

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    fn embed_request<'a>(&self, model: &str, text: &'a str) -> EmbedContentRequest<'a> {
        EmbedContentRequest {
            model: format!("models/{model}"),
            content: ContentPayload { parts: vec![TextPart { text }] },
            output_dimensionality: self.request_dimensions,
        }
    }
}

fn embedding_error(message: impl Into<String>) -> ChatError {
    ChatError::Embedding { provider: PROVIDER.into(), message: message.into() }
}

fn generation_error(message: impl Into<String>) -> ChatError {
    ChatError::Generation { provider: PROVIDER.into(), message: message.into() }
}

/// Read a failed response body, preferring the API's structured message.
async fn response_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail =
        serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body);
    format!("API returned {status}: {detail}")
}

// ── Gemini API request/response types ──────────────────────────────

#[derive(Serialize)]
pub(crate) struct EmbedContentRequest<'a> {
    pub(crate) model: String,
    pub(crate) content: ContentPayload<'a>,
    #[serde(rename = "outputDimensionality", skip_serializing_if = "Option::is_none")]
    pub(crate) output_dimensionality: Option<usize>,
}

#[derive(Serialize)]
pub(crate) struct BatchEmbedContentsRequest<'a> {
    pub(crate) requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Serialize)]
pub(crate) struct GenerateContentRequest<'a> {
    pub(crate) contents: Vec<ContentPayload<'a>>,
}

#[derive(Serialize)]
pub(crate) struct ContentPayload<'a> {
    pub(crate) parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
pub(crate) struct TextPart<'a> {
    pub(crate) text: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct EmbedContentResponse {
    pub(crate) embedding: EmbeddingValues,
}

#[derive(Deserialize)]
pub(crate) struct BatchEmbedContentsResponse {
    pub(crate) embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
pub(crate) struct EmbeddingValues {
    pub(crate) values: Vec<f32>,
}

#[derive(Deserialize)]
pub(crate) struct GenerationResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub(crate) struct Candidate {
    pub(crate) content: Option<CandidateContent>,
}

#[derive(Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub(crate) parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
pub(crate) struct CandidatePart {
    pub(crate) text: Option<String>,
}

impl GenerationResponse {
    /// Concatenated text of the first candidate's parts.
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorDetail,
}

#[derive(Deserialize)]
pub(crate) struct ErrorDetail {
    pub(crate) message: String,
}

// ── Embedder implementation ────────────────────────────────────────

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, text_len = text.len(), "embedding single text");

        let url = self.model_url(&self.embedding_model, "embedContent");
        let request = self.embed_request(&self.embedding_model, text);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
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

        let parsed: EmbedContentResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            embedding_error(format!("failed to parse response: {e}"))
        })?;

        Ok(parsed.embedding.values)
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = PROVIDER,
            batch_size = texts.len(),
            model = %self.embedding_model,
            "embedding batch"
        );

        let url = self.model_url(&self.embedding_model, "batchEmbedContents");
        let request = BatchEmbedContentsRequest {
            requests: texts
                .iter()
                .map(|text| self.embed_request(&self.embedding_model, text))
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
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

        let parsed: BatchEmbedContentsResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            embedding_error(format!("failed to parse response: {e}"))
        })?;

        Ok(parsed.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── TextGenerator implementation ───────────────────────────────────

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.generation_model,
            prompt_len = prompt.len(),
            "generating answer"
        );

        let url = self.model_url(&self.generation_model, "generateContent");
        let request = GenerateContentRequest {
            contents: vec![ContentPayload { parts: vec![TextPart { text: prompt }] }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                generation_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            error!(provider = PROVIDER, status = %response.status(), "API error");
            return Err(generation_error(response_detail(response).await));
        }

        let parsed: GenerationResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "failed to parse response");
            generation_error(format!("failed to parse response: {e}"))
        })?;

        if parsed.candidates.is_empty() {
            return Err(generation_error("API returned no candidates"));
        }

        Ok(parsed.text())
    }

    async fn generate_stream(&self, prompt: &str, cancel: CancelToken) -> Result<TokenStream> {
        debug!(
            provider = PROVIDER,
            model = %self.generation_model,
            prompt_len = prompt.len(),
            "opening answer stream"
        );

        let url = format!(
            "{}?alt=sse",
            self.model_url(&self.generation_model, "streamGenerateContent")
        );
        let request = GenerateContentRequest {
            contents: vec![ContentPayload { parts: vec![TextPart { text: prompt }] }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                generation_error(format!("request failed: {e}"))
            })?;

        if !response.status().is_success() {
            error!(provider = PROVIDER, status = %response.status(), "API error");
            return Err(generation_error(response_detail(response).await));
        }

        let mut events = Box::pin(response.bytes_stream().eventsource());
        let tokens = stream! {
            loop {
                let event = tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!(provider = PROVIDER, "generation stream cancelled");
                        yield Err(ChatError::Cancelled);
                        return;
                    }
                    event = events.next() => event,
                };
                let Some(event) = event else { break };

                match event {
                    Ok(event) => match serde_json::from_str::<GenerationResponse>(&event.data) {
                        Ok(chunk) => {
                            let text = chunk.text();
                            if !text.is_empty() {
                                yield Ok(text);
                            }
                        }
                        Err(e) => {
                            error!(provider = PROVIDER, error = %e, "failed to parse stream chunk");
                            yield Err(generation_error(format!(
                                "failed to parse stream chunk: {e}"
                            )));
                            return;
                        }
                    },
                    Err(e) => {
                        error!(provider = PROVIDER, error = %e, "stream transport failed");
                        yield Err(generation_error(format!("stream failed: {e}")));
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(tokens))
    }
}
