//! Error types shared across the docchat crates.

use thiserror::Error;

/// Errors that can occur while ingesting documents or answering questions.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A caller-supplied argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Two embedding vectors disagree on dimensionality.
    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },

    /// An error occurred in the chunk store backend.
    #[error("Chunk store error: {0}")]
    ChunkStore(String),

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during text generation.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The operation was cancelled by the caller.
    #[error("Operation cancelled")]
    Cancelled,
}

impl ChatError {
    /// True if this error is the cooperative-cancellation signal.
    ///
    /// Streaming consumers treat cancellation as a silent stop rather than
    /// a failure, so they need to tell it apart from real errors.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatError::Cancelled)
    }
}

/// A convenience result type for docchat operations.
pub type Result<T> = std::result::Result<T, ChatError>;
