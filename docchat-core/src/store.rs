//! Chunk store trait for persisting and fetching embedded chunks.

use async_trait::async_trait;

use crate::document::Chunk;
use crate::error::Result;

/// A storage backend for a document's embedded chunks.
///
/// Implementations key chunks by document id. Retrieval performs a full
/// scan over one document's chunks, so stores must return them all; there
/// is no store-side ranking.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_core::ChunkStore;
///
/// store.upsert_chunks("doc-1", &chunks).await?;
/// let chunks = store.fetch_chunks("doc-1").await?;
/// ```
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Insert or replace chunks under the given document id.
    ///
    /// A chunk replaces any stored chunk with the same `chunk_index`.
    async fn upsert_chunks(&self, document_id: &str, chunks: &[Chunk]) -> Result<()>;

    /// Fetch all chunks stored for the given document id, in `chunk_index`
    /// order.
    ///
    /// Returns an empty `Vec` when the document is unknown or has no
    /// chunks; callers do not distinguish the two.
    async fn fetch_chunks(&self, document_id: &str) -> Result<Vec<Chunk>>;
}
