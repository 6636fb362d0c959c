//! Corpus build pipeline: read source text, chunk, embed the whole batch,
//! write the `{id, text, embedding}` array as JSON.
//!
//! Unlike the retrieval path, the builder fails loudly. It runs under
//! operator supervision and must never leave a partially embedded corpus
//! behind, so output is written to a temp file and renamed into place.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::chunks::{chunk_words, DEFAULT_CHUNK_WORDS};
use crate::corpus::LoreChunk;
use crate::embedder::LoreEmbedder;

/// Run the full pipeline for one lore document. Embeds all chunks in a
/// single provider call to amortize the model load. Returns the number of
/// chunks written.
pub async fn build_corpus(
    source: &Path,
    out: &Path,
    chunk_size: Option<usize>,
    embedder: &LoreEmbedder,
) -> Result<usize, BuildError> {
    let raw = std::fs::read_to_string(source)
        .map_err(|e| BuildError::ReadSource(source.to_path_buf(), e))?;

    let size = chunk_size.unwrap_or(DEFAULT_CHUNK_WORDS);
    let chunks = chunk_words(&raw, size);
    if chunks.is_empty() {
        return Err(BuildError::EmptySource(source.to_path_buf()));
    }
    info!("chunked {} into {} chunks of {size} words", source.display(), chunks.len());

    let vectors = embedder
        .embed(&chunks)
        .await
        .ok_or(BuildError::EmbeddingUnavailable)?;

    let records = assemble(chunks, vectors)?;
    write_corpus(&records, out)?;
    info!("wrote {} chunks to {}", records.len(), out.display());
    Ok(records.len())
}

/// Pair chunk texts with their vectors and assign positional ids. Rejects
/// count mismatches and mixed dimensionality; a valid corpus holds one
/// vector per chunk, all the same length.
fn assemble(chunks: Vec<String>, vectors: Vec<Vec<f32>>) -> Result<Vec<LoreChunk>, BuildError> {
    if vectors.len() != chunks.len() {
        return Err(BuildError::CountMismatch {
            chunks: chunks.len(),
            vectors: vectors.len(),
        });
    }
    let dim = vectors.first().map(Vec::len).unwrap_or(0);
    if dim == 0 || vectors.iter().any(|v| v.len() != dim) {
        return Err(BuildError::DimensionMismatch);
    }
    Ok(chunks
        .into_iter()
        .zip(vectors)
        .enumerate()
        .map(|(i, (text, embedding))| LoreChunk {
            id: format!("chunk_{i}"),
            text,
            embedding,
        })
        .collect())
}

/// Serialize and write the corpus, replacing any existing file atomically
/// (write to `<out>.tmp`, then rename).
fn write_corpus(records: &[LoreChunk], out: &Path) -> Result<(), BuildError> {
    let json = serde_json::to_string(records)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BuildError::Write(out.to_path_buf(), e))?;
    }
    let mut tmp_name = out.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);
    std::fs::write(&tmp, json).map_err(|e| BuildError::Write(tmp.clone(), e))?;
    std::fs::rename(&tmp, out).map_err(|e| BuildError::Write(out.to_path_buf(), e))
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read source {0}: {1}")]
    ReadSource(PathBuf, std::io::Error),
    #[error("no text to chunk in {0}")]
    EmptySource(PathBuf),
    #[error("failed to generate embeddings (model unavailable)")]
    EmbeddingUnavailable,
    #[error("embedding count mismatch: {chunks} chunks but {vectors} vectors")]
    CountMismatch { chunks: usize, vectors: usize },
    #[error("inconsistent embedding dimensions in batch")]
    DimensionMismatch,
    #[error("failed to serialize corpus: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write corpus {0}: {1}")]
    Write(PathBuf, std::io::Error),
}
