//! Question-answering pipeline orchestrator.
//!
//! The [`QaPipeline`] coordinates the full workflow by composing an
//! [`Embedder`], a [`ChunkStore`], and a [`TextGenerator`]: document
//! ingestion (chunk → embed → store), blocking answers, and streaming
//! answers with source attribution and cooperative cancellation.
//!
//! # Example
//!
//! ```rust,ignore
//! use docchat_rag::{InMemoryChunkStore, QaConfig, QaPipeline};
//!
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())
//!     .embedder(Arc::new(my_embedder))
//!     .store(Arc::new(InMemoryChunkStore::new()))
//!     .generator(Arc::new(my_generator))
//!     .build()?;
//!
//! pipeline.ingest("doc-1", &full_text).await?;
//! let mut events = pipeline
//!     .stream_answer("doc-1", "what does it say?", &[], CancelToken::new())
//!     .await?;
//! ```

use std::sync::Arc;

use async_stream::stream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use docchat_core::{
    AnswerEvent, AnswerStream, CancelToken, ChatError, Chunk, ChunkStore, Embedder, Message,
    Result, ScoredChunk, Source, TextGenerator,
};

use crate::chunking::chunk_text;
use crate::config::QaConfig;
use crate::prompt::build_prompt;
use crate::retriever::ChunkRetriever;

/// The message carried by the in-band error event.
///
/// Deliberately generic: upstream failure detail goes to the server log,
/// never to the consumer.
pub const GENERATION_FAILED_MESSAGE: &str = "Generation failed";

/// A complete answer with its cited sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentAnswer {
    /// The generated answer text, whitespace-trimmed.
    pub answer: String,
    /// Ranked source references; ids run `1..=n`.
    pub sources: Vec<Source>,
}

/// The question-answering pipeline orchestrator.
///
/// Construct one via [`QaPipeline::builder()`]. All collaborators are
/// injected; the pipeline holds no global state and no connection of its
/// own, so one instance can serve concurrent requests.
pub struct QaPipeline {
    config: QaConfig,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn ChunkStore>,
    generator: Arc<dyn TextGenerator>,
    retriever: ChunkRetriever,
}

impl QaPipeline {
    /// Create a new [`QaPipelineBuilder`].
    pub fn builder() -> QaPipelineBuilder {
        QaPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Ingest a document's extracted text: chunk → embed → store.
    ///
    /// Chunks whose trimmed length is below the configured minimum are
    /// skipped, but the surviving chunks keep their original positions, so
    /// `chunk_index` may have gaps. Returns the number of chunks stored;
    /// zero (all chunks degenerate, or empty text) is not an error.
    ///
    /// # Errors
    ///
    /// Propagates embedding and store failures.
    pub async fn ingest(&self, document_id: &str, text: &str) -> Result<usize> {
        let raw_chunks = chunk_text(text, self.config.chunk_size, self.config.chunk_overlap);
        let kept: Vec<(usize, String)> = raw_chunks
            .into_iter()
            .enumerate()
            .filter(|(_, content)| content.trim().chars().count() >= self.config.min_chunk_len)
            .collect();

        if kept.is_empty() {
            info!(document.id = %document_id, chunk_count = 0, "ingested document (no usable chunks)");
            return Ok(0);
        }

        let texts: Vec<&str> = kept.iter().map(|(_, content)| content.as_str()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document_id, error = %e, "embedding failed during ingestion");
            e
        })?;

        let chunks: Vec<Chunk> = kept
            .into_iter()
            .zip(embeddings)
            .map(|((chunk_index, content), embedding)| Chunk { content, embedding, chunk_index })
            .collect();

        self.store.upsert_chunks(document_id, &chunks).await.map_err(|e| {
            error!(document.id = %document_id, error = %e, "upsert failed during ingestion");
            e
        })?;

        let chunk_count = chunks.len();
        info!(document.id = %document_id, chunk_count, "ingested document");
        Ok(chunk_count)
    }

    /// Answer a question in one blocking call.
    ///
    /// Runs the same retrieval and prompt-assembly steps as
    /// [`stream_answer`](QaPipeline::stream_answer) with empty conversation
    /// history, then waits for the complete generation. The answer text is
    /// whitespace-trimmed and paired with the ranked source references.
    ///
    /// # Errors
    ///
    /// Any retrieval or generation failure propagates; there is no partial
    /// result.
    pub async fn answer(&self, document_id: &str, question: &str) -> Result<DocumentAnswer> {
        let query = self.embedder.embed(question).await.map_err(|e| {
            error!(error = %e, "question embedding failed");
            e
        })?;
        let chunks = self.retriever.retrieve(document_id, &query, self.config.top_k).await?;
        let prompt = build_prompt(&chunks, question, &[]);

        let text = self.generator.generate(&prompt).await.map_err(|e| {
            error!(error = %e, "generation failed");
            e
        })?;

        let sources = build_sources(&chunks, self.config.preview_len);
        info!(document.id = %document_id, source_count = sources.len(), "answered question");
        Ok(DocumentAnswer { answer: text.trim().to_string(), sources })
    }

    /// Answer a question as an ordered event stream.
    ///
    /// Embeds the question, retrieves the top-K chunks, assembles the
    /// prompt with `history`, and opens the generation stream. Failures up
    /// to that point return `Err` directly; no events have been produced
    /// yet.
    ///
    /// The returned stream then follows the protocol contract:
    ///
    /// - each upstream token is forwarded as one [`AnswerEvent::Token`],
    ///   in arrival order, with `cancel` checked before every forward;
    /// - cancellation (or the generator's recognized
    ///   [`ChatError::Cancelled`]) ends the stream silently, keeping the
    ///   events already emitted;
    /// - any other mid-stream failure is logged and surfaced as a single
    ///   [`AnswerEvent::Error`] carrying [`GENERATION_FAILED_MESSAGE`];
    /// - a natural end with no cancellation emits exactly one
    ///   [`AnswerEvent::Sources`] followed by exactly one
    ///   [`AnswerEvent::Done`].
    pub async fn stream_answer(
        &self,
        document_id: &str,
        question: &str,
        history: &[Message],
        cancel: CancelToken,
    ) -> Result<AnswerStream> {
        debug!(
            document.id = %document_id,
            question_len = question.len(),
            history_len = history.len(),
            "streaming answer"
        );

        let query = self.embedder.embed(question).await.map_err(|e| {
            error!(error = %e, "question embedding failed");
            e
        })?;
        let chunks = self.retriever.retrieve(document_id, &query, self.config.top_k).await?;
        let prompt = build_prompt(&chunks, question, history);
        let sources = build_sources(&chunks, self.config.preview_len);

        let mut tokens =
            self.generator.generate_stream(&prompt, cancel.clone()).await.map_err(|e| {
                error!(error = %e, "failed to open generation stream");
                e
            })?;

        let events = stream! {
            while let Some(item) = tokens.next().await {
                if cancel.is_cancelled() {
                    debug!("answer stream cancelled");
                    return;
                }
                match item {
                    Ok(value) => yield AnswerEvent::Token { value },
                    Err(ChatError::Cancelled) => {
                        debug!("generation cancelled upstream");
                        return;
                    }
                    Err(e) => {
                        error!(error = %e, "generation failed mid-stream");
                        yield AnswerEvent::Error {
                            message: GENERATION_FAILED_MESSAGE.to_string(),
                        };
                        return;
                    }
                }
            }

            if cancel.is_cancelled() {
                debug!("answer stream cancelled");
                return;
            }
            yield AnswerEvent::Sources { value: sources };
            yield AnswerEvent::Done;
        };

        Ok(Box::pin(events))
    }
}

/// Map ranked chunks to 1-based source references.
fn build_sources(chunks: &[ScoredChunk], preview_len: usize) -> Vec<Source> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| Source::from_content(i + 1, &chunk.content, preview_len))
        .collect()
}

/// Builder for constructing a [`QaPipeline`].
///
/// All fields are required. Call [`build()`](QaPipelineBuilder::build) to
/// validate and produce the pipeline.
#[derive(Default)]
pub struct QaPipelineBuilder {
    config: Option<QaConfig>,
    embedder: Option<Arc<dyn Embedder>>,
    store: Option<Arc<dyn ChunkStore>>,
    generator: Option<Arc<dyn TextGenerator>>,
}

impl QaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the chunk store backend.
    pub fn store(mut self, store: Arc<dyn ChunkStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the text generation provider.
    pub fn generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the [`QaPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidArgument`] if any required field is
    /// missing.
    pub fn build(self) -> Result<QaPipeline> {
        let config = self
            .config
            .ok_or_else(|| ChatError::InvalidArgument("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| ChatError::InvalidArgument("embedder is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| ChatError::InvalidArgument("store is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| ChatError::InvalidArgument("generator is required".to_string()))?;

        let retriever = ChunkRetriever::new(store.clone());
        Ok(QaPipeline { config, embedder, store, generator, retriever })
    }
}
