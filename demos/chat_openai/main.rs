//! # OpenAI Embeddings Chat Demo
//!
//! Drives retrieval with live OpenAI embeddings while a fixed offline
//! generator produces the answer text, so the demo needs only
//! `OPENAI_API_KEY`. Retrieval is real: the cited sources are ranked by
//! cosine similarity over `text-embedding-3-small` vectors.
//!
//! Run: `cargo run --bin chat_openai`

use std::sync::Arc;

use docchat_core::{CancelToken, Result, TextGenerator, TokenStream};
use docchat_openai::OpenAIEmbedder;
use docchat_rag::{InMemoryChunkStore, QaConfig, QaPipeline};
use futures::StreamExt;

// ---------------------------------------------------------------------------
// OfflineGenerator: streams a fixed answer so only the embedder needs a key
// ---------------------------------------------------------------------------

struct OfflineGenerator {
    answer: String,
}

impl OfflineGenerator {
    fn new(answer: impl Into<String>) -> Self {
        Self { answer: answer.into() }
    }
}

#[async_trait::async_trait]
impl TextGenerator for OfflineGenerator {
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

    // 512 Matryoshka dimensions: ample for one document, a third of the
    // default request size.
    let embedder = Arc::new(OpenAIEmbedder::from_env()?.with_dimensions(512));

    let pipeline = QaPipeline::builder()
        .config(QaConfig::default())
        .embedder(embedder)
        .store(Arc::new(InMemoryChunkStore::new()))
        .generator(Arc::new(OfflineGenerator::new(
            "Scout bees perform a waggle dance on the comb: the angle of the \
             dance encodes the direction of the food relative to the sun, \
             and the waggle duration encodes the distance.",
        )))
        .build()?;

    let document = "Honeybee foragers returning from a rich food source \
                    recruit their nest mates with the waggle dance, performed \
                    on the vertical comb inside the dark hive. The dancer \
                    runs a short figure-of-eight circuit, vibrating her \
                    abdomen from side to side during the straight middle \
                    run. The angle of that waggle run relative to straight \
                    up encodes the direction of the food relative to the \
                    sun's azimuth, and the duration of the run encodes the \
                    distance, with roughly one second of waggling per \
                    kilometre of flight. Followers track the dance with \
                    their antennae in the darkness and then fly out along \
                    the advertised bearing. Dances for closer sources are \
                    brisker and shorter, grading into the round dance for \
                    food in the immediate vicinity of the hive. Karl von \
                    Frisch decoded the dance in the 1940s and received a \
                    Nobel Prize for the discovery in 1973.";

    let stored = pipeline.ingest("waggle-dance", document).await?;
    println!("Ingested {stored} chunk(s)\n");

    let question = "How do honeybees tell each other where the food is?";
    println!("Q: {question}");
    let mut events =
        pipeline.stream_answer("waggle-dance", question, &[], CancelToken::new()).await?;
    while let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    // Same question through the blocking path.
    let answered = pipeline.answer("waggle-dance", question).await?;
    println!("\nA: {}", answered.answer);
    for source in &answered.sources {
        println!("  [Source {}] {}", source.id, source.preview);
    }

    Ok(())
}
