/// Default chunk size in words. Keeps each resume prompt well inside the model's context.
pub const DEFAULT_CHUNK_WORDS: usize = 200;

/// Splits `text` on whitespace into consecutive groups of `words_per_chunk` words,
/// each re-joined with single spaces. The last chunk may be shorter.
///
/// Empty or whitespace-only input yields no chunks. A size of 0 is treated as 1.
pub fn chunk_words(text: &str, words_per_chunk: usize) -> Vec<String> {
    let size = words_per_chunk.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(size).map(|group| group.join(" ")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_words("", 200).is_empty());
        assert!(chunk_words("   \n\t ", 5).is_empty());
    }

    #[test]
    fn test_chunks_are_full_except_last() {
        let text = (1..=23).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let chunks = chunk_words(&text, 10);

        assert_eq!(chunks.len(), 3);
        let counts: Vec<usize> = chunks.iter().map(|c| c.split_whitespace().count()).collect();
        assert_eq!(counts, vec![10, 10, 3]);
    }

    #[test]
    fn test_exact_multiple_has_no_short_tail() {
        let chunks = chunk_words("a b c d e f", 3);
        assert_eq!(chunks, vec!["a b c", "d e f"]);
    }

    #[test]
    fn test_words_round_trip_and_whitespace_normalized() {
        let text = "Senior  engineer\n\nBuilt   caching layer\tfor payments API\r\nLed team of 4";
        let chunks = chunk_words(text, 4);

        let rejoined: Vec<&str> = chunks.iter().flat_map(|c| c.split(' ')).collect();
        let original: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(rejoined, original);
        assert!(chunks.iter().all(|c| !c.contains("  ")));
    }

    #[test]
    fn test_zero_size_treated_as_one() {
        assert_eq!(chunk_words("x y", 0), vec!["x", "y"]);
    }

    #[test]
    fn test_default_size_single_chunk_for_short_text() {
        let chunks = chunk_words("short resume text", DEFAULT_CHUNK_WORDS);
        assert_eq!(chunks, vec!["short resume text"]);
    }
}
