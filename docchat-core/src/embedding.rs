//! Embedding provider trait for turning text into vectors.

use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::error::Result;

/// Turns text into embedding vectors.
///
/// The pipeline embeds whole chunk batches at ingestion and single
/// questions at query time, so both granularities are first-class here.
/// [`embed_batch`](Embedder::embed_batch) defaults to one
/// [`embed`](Embedder::embed) call per input; backends with a native batch
/// endpoint override it.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_core::Embedder;
///
/// let embedding = embedder.embed("hello world").await?;
/// assert_eq!(embedding.len(), embedder.dimensions());
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts, preserving input order.
    ///
    /// The default runs the inputs through [`embed`](Embedder::embed) one
    /// at a time and stops at the first failure.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        stream::iter(texts).then(|text| self.embed(text)).try_collect().await
    }

    /// The dimensionality of every vector this provider produces.
    fn dimensions(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::ChatError;

    /// Embeds each text as its character count; fails on the marker input.
    struct LengthEmbedder {
        calls: AtomicUsize,
    }

    impl LengthEmbedder {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl Embedder for LengthEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text == "bad" {
                return Err(ChatError::Embedding {
                    provider: "test".into(),
                    message: "marker input".into(),
                });
            }
            Ok(vec![text.chars().count() as f32])
        }

        fn dimensions(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn default_batch_preserves_input_order() {
        let embedder = LengthEmbedder::new();
        let out = embedder.embed_batch(&["a", "bbb", "cc"]).await.unwrap();
        assert_eq!(out, vec![vec![1.0], vec![3.0], vec![2.0]]);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn default_batch_stops_at_first_failure() {
        let embedder = LengthEmbedder::new();
        let err = embedder.embed_batch(&["a", "bad", "cc"]).await.unwrap_err();
        assert!(matches!(err, ChatError::Embedding { .. }));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn default_batch_of_nothing_is_empty() {
        let embedder = LengthEmbedder::new();
        let out = embedder.embed_batch(&[]).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }
}
