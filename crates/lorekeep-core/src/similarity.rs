//! Vector and lexical similarity scoring for lore retrieval.
//!
//! `cosine` is the primary measure; `lexical_overlap` is the degraded-mode
//! measure used when embeddings are unavailable.

/// Sentinel returned by [`cosine`] for unusable input (empty, mismatched
/// length, or zero magnitude). Lower than any valid cosine similarity, which
/// is bounded in [-1, 1]. Callers filter non-positive scores before treating
/// a chunk as relevant, so the overlap with the valid extreme is harmless.
pub const INVALID_SIMILARITY: f32 = -1.0;

/// Cosine similarity between two vectors: dot product over the product of
/// Euclidean norms. Returns [`INVALID_SIMILARITY`] if either vector is empty,
/// their lengths differ, or either has zero magnitude.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return INVALID_SIMILARITY;
    }
    let mut dot = 0.0f32;
    let mut na = 0.0f32;
    let mut nb = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return INVALID_SIMILARITY;
    }
    dot / (na.sqrt() * nb.sqrt())
}

/// Splits text into lowercase alphanumeric token runs. Everything else
/// (punctuation, whitespace) is a separator.
pub fn tokenize(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in s.chars() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Token-overlap similarity between a pre-tokenized query and a text:
/// shared distinct tokens, normalized by sqrt of the product of the two
/// token-set sizes. A cosine over binary presence vectors, in [0, 1].
pub fn lexical_overlap(query_tokens: &std::collections::HashSet<String>, text: &str) -> f32 {
    let text_set: std::collections::HashSet<String> = tokenize(text).into_iter().collect();
    let shared = query_tokens.intersection(&text_set).count();
    let q_len = query_tokens.len().max(1);
    let t_len = text_set.len().max(1);
    let denom = (q_len as f32).sqrt() * (t_len as f32).sqrt();
    shared as f32 / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn cosine_self_is_one() {
        let a = vec![0.3, -1.2, 4.0];
        let sim = cosine(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_length_mismatch_is_sentinel() {
        assert_eq!(cosine(&[1.0, 2.0], &[1.0, 2.0, 3.0]), INVALID_SIMILARITY);
    }

    #[test]
    fn cosine_empty_is_sentinel() {
        assert_eq!(cosine(&[], &[]), INVALID_SIMILARITY);
        assert_eq!(cosine(&[], &[1.0]), INVALID_SIMILARITY);
    }

    #[test]
    fn cosine_zero_vector_is_sentinel() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 2.0]), INVALID_SIMILARITY);
        assert_eq!(cosine(&[1.0, 2.0], &[0.0, 0.0]), INVALID_SIMILARITY);
    }

    #[test]
    fn cosine_opposite_is_minus_one() {
        let a = vec![1.0, 2.0];
        let b = vec![-1.0, -2.0];
        let sim = cosine(&a, &b);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        assert_eq!(
            tokenize("The Dragon's hoard, glittering!"),
            vec!["the", "dragon", "s", "hoard", "glittering"]
        );
    }

    #[test]
    fn tokenize_empty_and_symbols() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("--- ~~ !!").is_empty());
    }

    #[test]
    fn overlap_identical_text_is_one() {
        let q: HashSet<String> = tokenize("goblins guard the tunnels").into_iter().collect();
        let score = lexical_overlap(&q, "goblins guard the tunnels");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn overlap_disjoint_text_is_zero() {
        let q: HashSet<String> = tokenize("silver river").into_iter().collect();
        assert_eq!(lexical_overlap(&q, "goblins guard the tunnels"), 0.0);
    }
}
