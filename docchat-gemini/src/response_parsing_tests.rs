//! Wire format tests for the Gemini REST API.
//!
//! Validate that real-world JSON payloads deserialize into our response
//! types, covering streaming chunks, missing fields, non-text parts, and
//! error bodies, and that request bodies serialize with the camelCase
//! field names the API expects.

use crate::client::{
    BatchEmbedContentsRequest, BatchEmbedContentsResponse, ContentPayload, EmbedContentRequest,
    EmbedContentResponse, ErrorResponse, GenerateContentRequest, GenerationResponse, TextPart,
};
use serde_json::json;

// ── Generation responses ────────────────────────────────────────────

#[test]
fn parse_simple_text_response() {
    let json = json!({
        "candidates": [{
            "content": {
                "parts": [{"text": "Hello, world!"}],
                "role": "model"
            },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 5,
            "candidatesTokenCount": 4,
            "totalTokenCount": 9
        },
        "modelVersion": "gemini-2.5-flash"
    });

    let resp: GenerationResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.candidates.len(), 1);
    assert_eq!(resp.text(), "Hello, world!");
}

#[test]
fn parse_streaming_chunk() {
    // A single SSE data payload from streamGenerateContent carries one
    // incremental fragment and usually no finish reason.
    let json = json!({
        "candidates": [{
            "content": {
                "parts": [{"text": " the next piece"}],
                "role": "model"
            },
            "index": 0
        }]
    });

    let resp: GenerationResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.text(), " the next piece");
}

#[test]
fn parse_multi_part_text_is_concatenated() {
    let json = json!({
        "candidates": [{
            "content": {
                "parts": [{"text": "first "}, {"text": "second"}],
                "role": "model"
            }
        }]
    });

    let resp: GenerationResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.text(), "first second");
}

#[test]
fn parse_empty_object_has_no_candidates() {
    let resp: GenerationResponse = serde_json::from_value(json!({})).unwrap();
    assert!(resp.candidates.is_empty());
    assert_eq!(resp.text(), "");
}

#[test]
fn parse_candidate_without_content() {
    // Safety-blocked responses carry a candidate with no content.
    let json = json!({
        "candidates": [{
            "finishReason": "SAFETY",
            "index": 0
        }]
    });

    let resp: GenerationResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.candidates.len(), 1);
    assert_eq!(resp.text(), "");
}

#[test]
fn parse_non_text_parts_are_skipped() {
    let json = json!({
        "candidates": [{
            "content": {
                "parts": [
                    {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}},
                    {"text": "caption"}
                ],
                "role": "model"
            }
        }]
    });

    let resp: GenerationResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.text(), "caption");
}

// ── Embedding responses ─────────────────────────────────────────────

#[test]
fn parse_embedding_response() {
    let json = json!({
        "embedding": {"values": [0.25, -0.5, 1.0]}
    });

    let resp: EmbedContentResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.embedding.values, vec![0.25, -0.5, 1.0]);
}

#[test]
fn parse_batch_embedding_response() {
    let json = json!({
        "embeddings": [
            {"values": [1.0, 0.0]},
            {"values": [0.0, 1.0]}
        ]
    });

    let resp: BatchEmbedContentsResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.embeddings.len(), 2);
    assert_eq!(resp.embeddings[0].values, vec![1.0, 0.0]);
    assert_eq!(resp.embeddings[1].values, vec![0.0, 1.0]);
}

// ── Error bodies ────────────────────────────────────────────────────

#[test]
fn parse_error_body() {
    let json = json!({
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT"
        }
    });

    let resp: ErrorResponse = serde_json::from_value(json).unwrap();
    assert_eq!(resp.error.message, "API key not valid. Please pass a valid API key.");
}

// ── Request bodies ──────────────────────────────────────────────────

#[test]
fn embed_request_uses_camel_case_dimensionality() {
    let request = EmbedContentRequest {
        model: "models/gemini-embedding-001".to_string(),
        content: ContentPayload { parts: vec![TextPart { text: "hello" }] },
        output_dimensionality: Some(768),
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({
            "model": "models/gemini-embedding-001",
            "content": {"parts": [{"text": "hello"}]},
            "outputDimensionality": 768
        })
    );
}

#[test]
fn embed_request_omits_unset_dimensionality() {
    let request = EmbedContentRequest {
        model: "models/gemini-embedding-001".to_string(),
        content: ContentPayload { parts: vec![TextPart { text: "hello" }] },
        output_dimensionality: None,
    };

    let value = serde_json::to_value(&request).unwrap();
    assert!(value.get("outputDimensionality").is_none());
}

#[test]
fn batch_embed_request_wraps_per_text_requests() {
    let request = BatchEmbedContentsRequest {
        requests: vec![
            EmbedContentRequest {
                model: "models/gemini-embedding-001".to_string(),
                content: ContentPayload { parts: vec![TextPart { text: "one" }] },
                output_dimensionality: None,
            },
            EmbedContentRequest {
                model: "models/gemini-embedding-001".to_string(),
                content: ContentPayload { parts: vec![TextPart { text: "two" }] },
                output_dimensionality: None,
            },
        ],
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["requests"][0]["content"]["parts"][0]["text"], "one");
    assert_eq!(value["requests"][1]["content"]["parts"][0]["text"], "two");
}

#[test]
fn generate_request_shape() {
    let request = GenerateContentRequest {
        contents: vec![ContentPayload { parts: vec![TextPart { text: "a prompt" }] }],
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
        value,
        json!({"contents": [{"parts": [{"text": "a prompt"}]}]})
    );
}
