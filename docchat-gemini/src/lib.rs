//! # docchat-gemini
//!
//! Gemini REST backend for the docchat engine: a single client implementing
//! both the [`Embedder`](docchat_core::Embedder) and
//! [`TextGenerator`](docchat_core::TextGenerator) traits, with SSE token
//! streaming and cooperative cancellation.

pub mod client;

pub use client::GeminiClient;

#[cfg(test)]
mod response_parsing_tests;
