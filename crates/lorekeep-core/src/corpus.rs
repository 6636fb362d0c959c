//! The persisted lore corpus: `{id, text, embedding}` records in one JSON
//! array. Chunks are written once by the builder and read-only afterwards.

use serde::{Deserialize, Serialize};

/// One unit of retrievable knowledge: a word window of the source document
/// with its embedding vector. All embeddings in one corpus share a single
/// dimensionality (the builder enforces this at write time).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoreChunk {
    /// Sequential position-based id, `chunk_0`, `chunk_1`, …
    /// Defaulted on load so a corpus hand-edited without ids still parses.
    #[serde(default)]
    pub id: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Parse a corpus file's contents. The top-level value must be a JSON array
/// or the whole parse fails; within the array, records missing a string
/// `text` or an array `embedding` are silently dropped rather than failing
/// the load. Returns the kept chunks in file order.
pub fn parse_corpus(raw: &str) -> Result<Vec<LoreChunk>, ParseError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let arr = value.as_array().ok_or(ParseError::NotAnArray)?;
    let chunks = arr
        .iter()
        .filter(|v| {
            v.get("text").map_or(false, |t| t.is_string())
                && v.get("embedding").map_or(false, |e| e.is_array())
        })
        .filter_map(|v| serde_json::from_value(v.clone()).ok())
        .collect();
    Ok(chunks)
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid corpus format (expected an array)")]
    NotAnArray,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_corpus() {
        let raw = r#"[
            {"id": "chunk_0", "text": "first", "embedding": [0.1, 0.2]},
            {"id": "chunk_1", "text": "second", "embedding": [0.3, 0.4]}
        ]"#;
        let chunks = parse_corpus(raw).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].id, "chunk_0");
        assert_eq!(chunks[1].text, "second");
        assert_eq!(chunks[1].embedding, vec![0.3, 0.4]);
    }

    #[test]
    fn parse_drops_malformed_records() {
        let raw = r#"[
            {"id": "chunk_0", "text": "good", "embedding": [0.1]},
            {"id": "chunk_1", "text": 42, "embedding": [0.1]},
            {"id": "chunk_2", "text": "no embedding"},
            {"id": "chunk_3", "text": "also good", "embedding": []}
        ]"#;
        let chunks = parse_corpus(raw).unwrap();
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["chunk_0", "chunk_3"]);
    }

    #[test]
    fn parse_rejects_non_array() {
        assert!(matches!(
            parse_corpus(r#"{"id": "chunk_0"}"#),
            Err(ParseError::NotAnArray)
        ));
    }

    #[test]
    fn parse_rejects_broken_json() {
        assert!(matches!(parse_corpus("[{"), Err(ParseError::Json(_))));
    }
}
