//! Data types for document chunks, retrieval results, and cited sources.

use serde::{Deserialize, Serialize};

/// A segment of a document's extracted text with its vector embedding.
///
/// A chunk is identified by its parent document id plus [`chunk_index`]
/// (its zero-based position in the original text). Indices may have gaps:
/// ingestion skips degenerate chunks but keeps the positions of the
/// survivors, so the index still reflects where each chunk came from.
///
/// [`chunk_index`]: Chunk::chunk_index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// The text content of the chunk.
    pub content: String,
    /// The vector embedding for this chunk's content.
    ///
    /// Produced once at ingestion and never mutated afterward. All chunks
    /// of a document share the dimensionality of the embedding provider
    /// that ingested them.
    pub embedding: Vec<f32>,
    /// Zero-based position of this chunk within the parent document.
    pub chunk_index: usize,
}

/// A retrieved chunk paired with its relevance score.
///
/// Transient: built fresh on every retrieval, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// The text content of the retrieved chunk.
    pub content: String,
    /// Cosine similarity against the query (higher is more relevant).
    pub score: f32,
}

/// Number of characters shown in a [`Source`] preview by default.
pub const DEFAULT_PREVIEW_LEN: usize = 120;

/// A user-facing reference to a chunk that contributed to an answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    /// 1-based rank of the chunk (1 = most relevant).
    pub id: usize,
    /// The first `preview_len` characters of the chunk plus `"..."`.
    pub preview: String,
}

impl Source {
    /// Build a source reference from ranked chunk content.
    ///
    /// The preview counts characters, not bytes, so multibyte text is never
    /// split mid code point. The ellipsis is always appended, even when the
    /// content fits entirely.
    pub fn from_content(id: usize, content: &str, preview_len: usize) -> Self {
        let preview: String = content.chars().take(preview_len).collect();
        Self { id, preview: format!("{preview}...") }
    }
}
