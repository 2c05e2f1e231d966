//! # Gemini Chat Demo
//!
//! Answers questions about an ingested document using the live Gemini API
//! for both embeddings and generation, then demonstrates cancelling a
//! stream mid-answer.
//!
//! Requires `GOOGLE_API_KEY`. Run: `cargo run --bin chat_gemini`

use std::sync::Arc;
use std::time::Duration;

use docchat_core::CancelToken;
use docchat_gemini::GeminiClient;
use docchat_rag::{InMemoryChunkStore, QaConfig, QaPipeline};
use futures::StreamExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // One client serves both embedding and generation. 768 dimensions is
    // plenty for a single-document demo and keeps requests small.
    let client = Arc::new(GeminiClient::from_env()?.with_dimensions(768));

    let pipeline = QaPipeline::builder()
        .config(QaConfig::default())
        .embedder(client.clone())
        .store(Arc::new(InMemoryChunkStore::new()))
        .generator(client)
        .build()?;

    let document = "The Antikythera mechanism is an ancient Greek analogue \
                    computer used to predict astronomical positions and \
                    eclipses decades in advance. Retrieved from the sea in \
                    1901 from a shipwreck off the coast of the Greek island \
                    of Antikythera, it has been dated to around 100 BC. The \
                    device contained at least thirty interlocking bronze \
                    gears, and a hand crank moved pointers across dials that \
                    modelled the cycles of the Sun and Moon, including the \
                    Moon's variable speed along its elliptical orbit. A dial \
                    on the back tracked the Saros cycle used to predict \
                    eclipses, while another followed the four-year cycle of \
                    the Olympic games. Nothing of comparable mechanical \
                    sophistication is known to have existed for more than a \
                    thousand years afterwards.";

    let stored = pipeline.ingest("antikythera", document).await?;
    println!("Ingested {stored} chunk(s)\n");

    let question = "What was the Antikythera mechanism used for?";
    println!("Q: {question}");
    let mut events =
        pipeline.stream_answer("antikythera", question, &[], CancelToken::new()).await?;
    while let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    // Cancel the next stream shortly after it starts. The stream just stops:
    // no sources, no done, no error.
    let cancel = CancelToken::new();
    println!("\nQ: Describe every gear in the mechanism. (cancelled after 300ms)");
    let mut events = pipeline
        .stream_answer("antikythera", "Describe every gear in the mechanism.", &[], cancel.clone())
        .await?;
    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        cancel.cancel();
    });
    while let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&event)?);
    }
    canceller.await?;
    println!("(stream ended after cancellation)");

    Ok(())
}
