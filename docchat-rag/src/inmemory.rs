//! In-memory chunk store.
//!
//! This module provides [`InMemoryChunkStore`], a zero-dependency store
//! backed by a `HashMap` protected by a `tokio::sync::RwLock`. It is
//! suitable for development, testing, and small-scale use.

use std::collections::HashMap;

use async_trait::async_trait;
use docchat_core::{Chunk, ChunkStore, Result};
use tokio::sync::RwLock;

/// An in-memory [`ChunkStore`] keyed by document id.
///
/// Chunks are kept sorted by `chunk_index`, so
/// [`fetch_chunks`](ChunkStore::fetch_chunks) always yields the same scan
/// order. All operations are async-safe via `tokio::sync::RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryChunkStore {
    documents: RwLock<HashMap<String, Vec<Chunk>>>,
}

impl InMemoryChunkStore {
    /// Create a new empty in-memory chunk store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn upsert_chunks(&self, document_id: &str, chunks: &[Chunk]) -> Result<()> {
        let mut documents = self.documents.write().await;
        let stored = documents.entry(document_id.to_string()).or_default();
        for chunk in chunks {
            match stored.iter_mut().find(|c| c.chunk_index == chunk.chunk_index) {
                Some(existing) => *existing = chunk.clone(),
                None => stored.push(chunk.clone()),
            }
        }
        stored.sort_by_key(|c| c.chunk_index);
        Ok(())
    }

    async fn fetch_chunks(&self, document_id: &str) -> Result<Vec<Chunk>> {
        let documents = self.documents.read().await;
        Ok(documents.get(document_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, content: &str) -> Chunk {
        Chunk { content: content.to_string(), embedding: vec![0.0; 4], chunk_index: index }
    }

    #[tokio::test]
    async fn unknown_document_fetches_empty() {
        let store = InMemoryChunkStore::new();
        assert!(store.fetch_chunks("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_returns_chunks_in_index_order() {
        let store = InMemoryChunkStore::new();
        store
            .upsert_chunks("doc", &[chunk(3, "c"), chunk(0, "a"), chunk(1, "b")])
            .await
            .unwrap();

        let fetched = store.fetch_chunks("doc").await.unwrap();
        let indices: Vec<usize> = fetched.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
    }

    #[tokio::test]
    async fn upsert_replaces_same_index() {
        let store = InMemoryChunkStore::new();
        store.upsert_chunks("doc", &[chunk(0, "old")]).await.unwrap();
        store.upsert_chunks("doc", &[chunk(0, "new")]).await.unwrap();

        let fetched = store.fetch_chunks("doc").await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].content, "new");
    }

    #[tokio::test]
    async fn documents_are_isolated() {
        let store = InMemoryChunkStore::new();
        store.upsert_chunks("a", &[chunk(0, "a0")]).await.unwrap();
        store.upsert_chunks("b", &[chunk(0, "b0")]).await.unwrap();

        assert_eq!(store.fetch_chunks("a").await.unwrap()[0].content, "a0");
        assert_eq!(store.fetch_chunks("b").await.unwrap()[0].content, "b0");
    }
}
