//! Prompt assembly for document-grounded answers.

use docchat_core::{Message, Role, ScoredChunk};

/// Assemble the generation prompt from ranked chunks, the question, and
/// prior conversation.
///
/// The template is deterministic: an instruction block, a `Sources:` block
/// with each chunk rendered as `[Source N]` (1-based, input order) and
/// blocks separated by a blank line, a `Conversation history:` block with
/// one `Speaker: text` line per turn, the question, and a final `Answer:`
/// cue. The returned string ends on the `Answer:` line.
///
/// Content is inserted verbatim; there is no escaping, sanitizing, or
/// length limiting. Empty chunk or history input leaves the corresponding
/// block empty but keeps its header.
pub fn build_prompt(chunks: &[ScoredChunk], question: &str, history: &[Message]) -> String {
    let sources = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[Source {}]\n{}", i + 1, chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    let history_text = history
        .iter()
        .map(|message| {
            let speaker = match message.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{speaker}: {}", message.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a helpful AI assistant.

Rules:
- Answer ONLY using the sources below.
- If the answer is not present, say: \"I don't know\".
- Mention source numbers when relevant (e.g., Source 1, Source 3).
- Use previous conversation context if needed.

Sources:
{sources}

Conversation history:
{history_text}

Current question:
{question}

Answer:"
    )
}
