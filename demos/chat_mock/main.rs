//! # Mock Chat Demo
//!
//! Exercises the full question-answering pipeline with **zero API keys**:
//! a deterministic hash-based embedder and a canned generator that streams
//! its answer word by word.
//!
//! Run: `cargo run --bin chat_mock`

use std::sync::Arc;

use docchat_core::{CancelToken, Embedder, Message, Result, TextGenerator, TokenStream};
use docchat_rag::{InMemoryChunkStore, QaConfig, QaPipeline};
use futures::StreamExt;

// ---------------------------------------------------------------------------
// MockEmbedder: deterministic hash-based embeddings for demos
// ---------------------------------------------------------------------------

struct MockEmbedder {
    dimensions: usize,
}

#[async_trait::async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // Deterministic embedding: hash the text bytes, then generate a
        // normalised vector whose direction depends on the content.
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        // L2-normalise so cosine similarity is just the dot product.
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ---------------------------------------------------------------------------
// CannedGenerator: streams a fixed answer word by word
// ---------------------------------------------------------------------------

struct CannedGenerator {
    answer: String,
}

#[async_trait::async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.answer.clone())
    }

    async fn generate_stream(&self, _prompt: &str, _cancel: CancelToken) -> Result<TokenStream> {
        let words: Vec<Result<String>> =
            self.answer.split_inclusive(' ').map(|w| Ok(w.to_string())).collect();
        Ok(Box::pin(futures::stream::iter(words)))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Small chunks keep the demo output readable; top_k=3 cites at most
    // three sources per answer.
    let config = QaConfig::builder()
        .chunk_size(200)
        .chunk_overlap(50)
        .min_chunk_len(20)
        .top_k(3)
        .build()?;

    let pipeline = QaPipeline::builder()
        .config(config)
        .embedder(Arc::new(MockEmbedder { dimensions: 64 }))
        .store(Arc::new(InMemoryChunkStore::new()))
        .generator(Arc::new(CannedGenerator {
            answer: "Rust achieves memory safety through its ownership system, \
                     which tracks who owns each value at compile time (Source 1). \
                     Borrowing rules prevent data races without a garbage \
                     collector (Source 2)."
                .to_string(),
        }))
        .build()?;

    let document = "Rust is a systems programming language focused on safety, \
                    speed, and concurrency. It achieves memory safety without a \
                    garbage collector through its ownership system. Every value \
                    in Rust has a single owner, and the compiler enforces this \
                    at compile time. When the owner goes out of scope, the value \
                    is dropped and its memory freed. Borrowing lets code access \
                    a value without taking ownership: any number of shared \
                    references, or exactly one mutable reference, may exist at a \
                    time. These rules are checked statically, so data races are \
                    rejected before the program ever runs.";

    let stored = pipeline.ingest("doc_1", document).await?;
    println!("Ingested {stored} chunk(s)\n");

    // Stream an answer as NDJSON, one event per line.
    let question = "How does Rust achieve memory safety?";
    println!("Q: {question}");
    let mut events = pipeline.stream_answer("doc_1", question, &[], CancelToken::new()).await?;
    while let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    // Follow-up question carrying conversation history.
    let history =
        vec![Message::user(question), Message::assistant("Through its ownership system.")];
    let follow_up = "What about data races?";
    println!("\nQ: {follow_up}");
    let mut events = pipeline.stream_answer("doc_1", follow_up, &history, CancelToken::new()).await?;
    while let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    // Cancel mid-stream: take one token, then stop. No sources, no done.
    let cancel = CancelToken::new();
    println!("\nQ: {question} (cancelled after one token)");
    let mut events = pipeline.stream_answer("doc_1", question, &[], cancel.clone()).await?;
    if let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&event)?);
    }
    cancel.cancel();
    let remaining: Vec<_> = events.collect().await;
    println!("(cancelled; {} further events)", remaining.len());

    // Non-streaming variant returns the whole answer with its sources.
    let result = pipeline.answer("doc_1", "What is ownership?").await?;
    println!("\nA: {}", result.answer);
    for source in &result.sources {
        println!("  [Source {}] {}", source.id, source.preview);
    }

    Ok(())
}
