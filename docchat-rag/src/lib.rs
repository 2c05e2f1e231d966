//! # docchat-rag
//!
//! Retrieval and answer orchestration for the docchat document QA engine:
//! cosine scoring, top-K chunk retrieval, prompt assembly, document
//! ingestion, and the streaming answer pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use docchat_core::CancelToken;
//! use docchat_rag::{InMemoryChunkStore, QaConfig, QaPipeline};
//! use futures::StreamExt;
//!
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())
//!     .embedder(Arc::new(embedder))
//!     .store(Arc::new(InMemoryChunkStore::new()))
//!     .generator(Arc::new(generator))
//!     .build()?;
//!
//! pipeline.ingest("doc-1", &extracted_text).await?;
//!
//! let mut events = pipeline
//!     .stream_answer("doc-1", "what is this about?", &[], CancelToken::new())
//!     .await?;
//! while let Some(event) = events.next().await {
//!     println!("{event:?}");
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod inmemory;
pub mod pipeline;
pub mod prompt;
pub mod retriever;
pub mod similarity;

pub use chunking::chunk_text;
pub use config::{QaConfig, QaConfigBuilder};
pub use inmemory::InMemoryChunkStore;
pub use pipeline::{DocumentAnswer, GENERATION_FAILED_MESSAGE, QaPipeline, QaPipelineBuilder};
pub use prompt::build_prompt;
pub use retriever::ChunkRetriever;
pub use similarity::cosine_similarity;
