//! # docchat-openai
//!
//! OpenAI embeddings backend for the docchat engine: an
//! [`Embedder`](docchat_core::Embedder) over the `/embeddings` REST
//! endpoint, with Matryoshka dimension truncation.

pub mod embedder;

pub use embedder::OpenAIEmbedder;
