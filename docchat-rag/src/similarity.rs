//! Cosine similarity scoring.

use docchat_core::{ChatError, Result};

/// Compute cosine similarity between two vectors.
///
/// Returns `dot(a, b) / (|a| * |b|)`, in `[-1.0, 1.0]` for non-degenerate
/// input. If either vector has zero magnitude the score is 0.0; NaN never
/// escapes.
///
/// # Errors
///
/// Returns [`ChatError::DimensionMismatch`] when the vectors disagree on
/// length. Mixed-dimensionality input means the document was embedded with
/// a different provider than the query, which would silently poison every
/// score, so it fails loudly instead.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ChatError::DimensionMismatch { left: a.len(), right: b.len() });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}
