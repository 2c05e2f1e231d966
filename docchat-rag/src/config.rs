//! Configuration for the question-answering pipeline.

use docchat_core::{ChatError, DEFAULT_PREVIEW_LEN, Result};
use serde::{Deserialize, Serialize};

/// Configuration parameters for a [`QaPipeline`](crate::QaPipeline).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaConfig {
    /// Number of top-ranked chunks fed into the prompt.
    pub top_k: usize,
    /// Number of characters shown in each source preview.
    pub preview_len: usize,
    /// Maximum chunk size in characters at ingestion.
    pub chunk_size: usize,
    /// Number of overlapping characters between consecutive chunks.
    pub chunk_overlap: usize,
    /// Chunks whose trimmed length is below this are skipped at ingestion.
    pub min_chunk_len: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            preview_len: DEFAULT_PREVIEW_LEN,
            chunk_size: 800,
            chunk_overlap: 100,
            min_chunk_len: 50,
        }
    }
}

impl QaConfig {
    /// Create a new builder for constructing a [`QaConfig`].
    pub fn builder() -> QaConfigBuilder {
        QaConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`QaConfig`].
#[derive(Debug, Clone, Default)]
pub struct QaConfigBuilder {
    config: QaConfig,
}

impl QaConfigBuilder {
    /// Set the number of top-ranked chunks fed into the prompt.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the number of characters shown in each source preview.
    pub fn preview_len(mut self, len: usize) -> Self {
        self.config.preview_len = len;
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the minimum trimmed chunk length kept at ingestion.
    pub fn min_chunk_len(mut self, len: usize) -> Self {
        self.config.min_chunk_len = len;
        self
    }

    /// Build the [`QaConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidArgument`] if:
    /// - `top_k == 0`
    /// - `preview_len == 0`
    /// - `chunk_overlap >= chunk_size`
    pub fn build(self) -> Result<QaConfig> {
        if self.config.top_k == 0 {
            return Err(ChatError::InvalidArgument(
                "top_k must be greater than zero".to_string(),
            ));
        }
        if self.config.preview_len == 0 {
            return Err(ChatError::InvalidArgument(
                "preview_len must be greater than zero".to_string(),
            ));
        }
        if self.config.chunk_overlap >= self.config.chunk_size {
            return Err(ChatError::InvalidArgument(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.config.chunk_overlap, self.config.chunk_size
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let config = QaConfig::builder().build().unwrap();
        assert_eq!(config, QaConfig::default());
        assert_eq!(config.top_k, 5);
        assert_eq!(config.preview_len, 120);
        assert_eq!(config.min_chunk_len, 50);
    }

    #[test]
    fn zero_top_k_is_rejected() {
        let err = QaConfig::builder().top_k(0).build().unwrap_err();
        assert!(matches!(err, ChatError::InvalidArgument(_)));
    }

    #[test]
    fn zero_preview_len_is_rejected() {
        let err = QaConfig::builder().preview_len(0).build().unwrap_err();
        assert!(matches!(err, ChatError::InvalidArgument(_)));
    }

    #[test]
    fn overlap_at_or_above_chunk_size_is_rejected() {
        let err = QaConfig::builder().chunk_size(100).chunk_overlap(100).build().unwrap_err();
        assert!(matches!(err, ChatError::InvalidArgument(_)));
        let err = QaConfig::builder().chunk_size(100).chunk_overlap(150).build().unwrap_err();
        assert!(matches!(err, ChatError::InvalidArgument(_)));
    }

    #[test]
    fn builder_overrides_stick() {
        let config = QaConfig::builder()
            .top_k(3)
            .preview_len(80)
            .chunk_size(400)
            .chunk_overlap(40)
            .min_chunk_len(0)
            .build()
            .unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.preview_len, 80);
        assert_eq!(config.chunk_size, 400);
        assert_eq!(config.chunk_overlap, 40);
        assert_eq!(config.min_chunk_len, 0);
    }
}
