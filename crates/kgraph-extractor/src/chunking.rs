//! Word-window chunking for large documents

/// Split `text` into windows of `chunk_size` words, consecutive windows sharing `overlap` words
///
/// Whitespace inside each chunk is normalized to single spaces. Text with no
/// words yields no chunks. The last window always ends on the last word; no
/// trailing window consists only of overlap.
///
/// `chunk_size` must be positive and larger than `overlap`; the extractor
/// validates this before calling.
///
/// # Examples
///
/// ```
/// use kgraph_extractor::chunk_words;
///
/// let chunks = chunk_words("a b c d e", 3, 1);
/// assert_eq!(chunks, vec!["a b c", "c d e"]);
/// ```
pub fn chunk_words(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let end = (start + chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end == words.len() {
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
    fn test_small_text_single_chunk() {
        let chunks = chunk_words("Short text here.", 10, 2);
        assert_eq!(chunks, vec!["Short text here."]);
    }

    #[test]
    fn test_empty_text() {
        assert!(chunk_words("", 10, 2).is_empty());
        assert!(chunk_words(" \n\t ", 10, 2).is_empty());
    }

    #[test]
    fn test_overlap_shared_between_chunks() {
        let text = "one two three four five six seven";
        let chunks = chunk_words(text, 4, 2);
        assert_eq!(
            chunks,
            vec!["one two three four", "three four five six", "five six seven"]
        );
    }

    #[test]
    fn test_no_overlap() {
        let chunks = chunk_words("a b c d", 2, 0);
        assert_eq!(chunks, vec!["a b", "c d"]);
    }

    #[test]
    fn test_exact_fit_has_no_trailing_overlap_chunk() {
        let chunks = chunk_words("a b c d e", 3, 1);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.last().unwrap().ends_with('e'));
    }

    #[test]
    fn test_whitespace_normalized() {
        let chunks = chunk_words("a\n\nb   c", 10, 0);
        assert_eq!(chunks, vec!["a b c"]);
    }
}
