//! Splits a lore document into fixed-size word windows for embedding.
//!
//! Boundaries are purely positional (word count), not sentence-aware. That
//! keeps chunking fully deterministic for a given input, at the cost of the
//! occasional mid-sentence split.

/// Default words per chunk. Large enough to carry context for the embedding
/// model, small enough that a few chunks fit in a dialogue prompt.
pub const DEFAULT_CHUNK_WORDS: usize = 600;

/// Chunk a document into consecutive windows of `chunk_words` whitespace-
/// delimited words; the final window may be shorter. Empty and whitespace-only
/// windows are discarded. A `chunk_words` of 0 is treated as 1.
pub fn chunk_words(text: &str, chunk_words: usize) -> Vec<String> {
    let size = chunk_words.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(size)
        .map(|w| w.join(" "))
        .filter(|c| !c.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_short_text_is_single_chunk() {
        let c = chunk_words("The red dragon sleeps.", 600);
        assert_eq!(c, vec!["The red dragon sleeps."]);
    }

    #[test]
    fn chunk_splits_on_word_count() {
        let text = "The red dragon sleeps in Ashfang Cavern. Goblins guard the outer tunnels. The hoard glitters beneath old stone.";
        let c = chunk_words(text, 6);
        assert_eq!(
            c,
            vec![
                "The red dragon sleeps in Ashfang",
                "Cavern. Goblins guard the outer tunnels.",
                "The hoard glitters beneath old stone.",
            ]
        );
    }

    #[test]
    fn chunk_collapses_whitespace_runs() {
        let c = chunk_words("one\n\ntwo\tthree   four", 2);
        assert_eq!(c, vec!["one two", "three four"]);
    }

    #[test]
    fn chunk_empty_input_is_empty() {
        assert!(chunk_words("", 600).is_empty());
        assert!(chunk_words("   \n\t  ", 600).is_empty());
    }

    #[test]
    fn chunk_zero_size_clamps_to_one() {
        let c = chunk_words("a b c", 0);
        assert_eq!(c, vec!["a", "b", "c"]);
    }

    #[test]
    fn chunk_is_deterministic() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        assert_eq!(chunk_words(text, 3), chunk_words(text, 3));
    }
}
