//! Conversation messages and the streaming answer protocol.

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::document::Source;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking questions.
    User,
    /// The model's previous answers.
    Assistant,
}

/// A single turn of prior conversation, passed read-only into prompt assembly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Who spoke.
    pub role: Role,
    /// What they said.
    pub text: String,
}

impl Message {
    /// Convenience constructor for a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    /// Convenience constructor for an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }
}

/// An event emitted while streaming an answer.
///
/// Per invocation the ordering contract is: zero or more `Token` events,
/// then at most one `Sources`, then at most one `Done`. A failed stream
/// ends with a single `Error` instead; a cancelled stream just ends.
///
/// The serde representation is tagged on `"type"` with lowercase variant
/// names, so writing one serialized event per line produces an NDJSON feed
/// (`{"type":"token","value":"..."}`, `{"type":"done"}`, ...) that a
/// presentation layer can forward verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnswerEvent {
    /// One increment of generated answer text, in arrival order.
    Token {
        /// The token text. May be empty only if the generator emits it.
        value: String,
    },
    /// The ranked source references backing the answer. Sent once, after
    /// the final token.
    Sources {
        /// Sources in rank order; ids run `1..=n`.
        value: Vec<Source>,
    },
    /// Terminal marker of a successful stream.
    Done,
    /// Terminal marker of a failed stream. The message is generic; upstream
    /// detail stays in the server logs.
    Error {
        /// Human-readable, sanitized description.
        message: String,
    },
}

/// A pinned, sendable stream of [`AnswerEvent`]s.
pub type AnswerStream = Pin<Box<dyn Stream<Item = AnswerEvent> + Send>>;
