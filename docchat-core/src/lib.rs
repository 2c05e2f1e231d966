//! # docchat-core
//!
//! Shared vocabulary for the docchat document-question-answering engine:
//! data types, the streaming answer protocol, cooperative cancellation,
//! collaborator traits, and the error taxonomy.
//!
//! The pipeline in `docchat-rag` composes three collaborators, all defined
//! here as object-safe async traits:
//!
//! - [`ChunkStore`] persists and fetches a document's embedded chunks
//! - [`Embedder`] turns text into vectors
//! - [`TextGenerator`] produces answer text, blocking or token-by-token
//!
//! Answers stream as [`AnswerEvent`]s with a strict ordering contract
//! (tokens, then sources, then done), and a caller-held [`CancelToken`]
//! stops a stream cooperatively at any point.

pub mod cancel;
pub mod chat;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod store;

pub use cancel::CancelToken;
pub use chat::{AnswerEvent, AnswerStream, Message, Role};
pub use document::{Chunk, DEFAULT_PREVIEW_LEN, ScoredChunk, Source};
pub use embedding::Embedder;
pub use error::{ChatError, Result};
pub use generation::{TextGenerator, TokenStream};
pub use store::ChunkStore;
