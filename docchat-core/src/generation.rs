//! Text generation trait for blocking and streaming answers.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::cancel::CancelToken;
use crate::error::Result;

/// A pinned, sendable stream of generated tokens.
///
/// Each item is one increment of answer text as the model produced it, or
/// the error that ended the stream.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// A provider that generates answer text from an assembled prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate the complete answer text in one call.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate the answer as a token stream.
    ///
    /// Implementations must watch `cancel` and terminate promptly once it
    /// fires, yielding [`ChatError::Cancelled`](crate::ChatError::Cancelled)
    /// as the final item so callers can tell an intentional abort apart
    /// from an upstream failure.
    async fn generate_stream(&self, prompt: &str, cancel: CancelToken) -> Result<TokenStream>;
}
