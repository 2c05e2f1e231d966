//! Top-K chunk retrieval by cosine similarity.

use std::cmp::Ordering;
use std::sync::Arc;

use docchat_core::{ChatError, ChunkStore, Result, ScoredChunk};
use tracing::debug;

use crate::similarity::cosine_similarity;

/// Retrieves the most relevant chunks of one document for a query vector.
///
/// Retrieval is a full scan: fetch every chunk of the document, score each
/// against the query, sort descending, keep the top K. Documents carry tens
/// to low hundreds of chunks, so there is no index and no caching; every
/// call re-reads the store.
pub struct ChunkRetriever {
    store: Arc<dyn ChunkStore>,
}

impl ChunkRetriever {
    /// Create a retriever over the given chunk store.
    pub fn new(store: Arc<dyn ChunkStore>) -> Self {
        Self { store }
    }

    /// Return the `top_k` most relevant chunks of `document_id` for `query`.
    ///
    /// Results are ordered by descending similarity; ties keep the store's
    /// fetch order (the sort is stable). Returns exactly
    /// `min(top_k, stored_chunks)` results, which means an empty `Vec` for
    /// an unknown or chunkless document.
    ///
    /// # Errors
    ///
    /// - [`ChatError::InvalidArgument`] if `top_k` is zero (checked before
    ///   any I/O).
    /// - [`ChatError::DimensionMismatch`] if any stored chunk disagrees
    ///   with the query on dimensionality.
    /// - [`ChatError::ChunkStore`] if the store fails.
    pub async fn retrieve(
        &self,
        document_id: &str,
        query: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        if top_k == 0 {
            return Err(ChatError::InvalidArgument(
                "top_k must be greater than zero".to_string(),
            ));
        }

        let chunks = self.store.fetch_chunks(document_id).await?;
        if chunks.is_empty() {
            debug!(document.id = %document_id, "no chunks stored for document");
            return Ok(Vec::new());
        }

        let mut scored = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let score = cosine_similarity(&chunk.embedding, query)?;
            scored.push(ScoredChunk { content: chunk.content, score });
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);

        debug!(document.id = %document_id, result_count = scored.len(), "retrieved chunks");
        Ok(scored)
    }
}
