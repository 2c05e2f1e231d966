//! Fixed-size text chunking with overlap.

/// Split text into fixed-size character windows with overlap.
///
/// Windows are `chunk_size` characters long and consecutive windows share
/// `chunk_overlap` characters, so positions advance by
/// `chunk_size - chunk_overlap`. Boundaries are computed in characters and
/// mapped back to byte offsets, so multibyte input never splits a code
/// point. The final window may be shorter than `chunk_size`.
///
/// Returns an empty `Vec` for empty text or a zero `chunk_size`. An overlap
/// at or above the chunk size would make no forward progress; the loop
/// stops after the first window in that case (pipeline configuration
/// rejects such values up front).
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let boundaries: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
    let total_chars = boundaries.len();
    let step = chunk_size.saturating_sub(chunk_overlap);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < total_chars {
        let end = (start + chunk_size).min(total_chars);
        let byte_start = boundaries[start];
        let byte_end = if end == total_chars { text.len() } else { boundaries[end] };
        chunks.push(text[byte_start..byte_end].to_string());

        if step == 0 {
            break;
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 100, 10).is_empty());
    }

    #[test]
    fn short_text_yields_single_chunk() {
        let chunks = chunk_text("hello", 100, 10);
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn windows_overlap_by_configured_amount() {
        let text = "abcdefghij";
        let chunks = chunk_text(text, 4, 2);
        assert_eq!(chunks, vec!["abcd", "cdef", "efgh", "ghij", "ij"]);
    }

    #[test]
    fn no_overlap_tiles_the_text() {
        let chunks = chunk_text("abcdefgh", 3, 0);
        assert_eq!(chunks, vec!["abc", "def", "gh"]);
    }

    #[test]
    fn multibyte_text_never_splits_a_code_point() {
        let text = "日本語のテキストです。これは分割の試験。";
        let chunks = chunk_text(text, 5, 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 5);
        }
        // Reassembling the non-overlapping prefix of each chunk recovers
        // the original text.
        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let skip = if i == 0 { 0 } else { 1 };
            rebuilt.extend(chunk.chars().skip(skip));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn full_overlap_stops_after_first_window() {
        let chunks = chunk_text("abcdef", 3, 3);
        assert_eq!(chunks, vec!["abc"]);
    }
}
