//! In-memory lore store. Owns the loaded corpus and answers retrieval
//! queries for the dialogue endpoint.
//!
//! Retrieval is advisory grounding: every failure inside this module
//! degrades to fewer (or zero) results, never an error toward the caller.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{error, info, warn};

use crate::corpus::{parse_corpus, LoreChunk};
use crate::embedder::LoreEmbedder;
use crate::similarity::{cosine, lexical_overlap, tokenize};

/// Default number of lore snippets handed to the dialogue prompt.
pub const DEFAULT_TOP_K: usize = 3;

/// Holds the corpus behind an RwLock'd Arc: readers clone the Arc (an atomic
/// snapshot), a reload builds the new vector fully and swaps it in. Readers
/// never observe a half-replaced corpus.
pub struct LoreStore {
    path: PathBuf,
    corpus: RwLock<Arc<Vec<LoreChunk>>>,
    embedder: LoreEmbedder,
}

impl LoreStore {
    /// Create a store for the corpus file at `path` without loading it yet.
    pub fn new(path: impl Into<PathBuf>, embedder: LoreEmbedder) -> Self {
        Self {
            path: path.into(),
            corpus: RwLock::new(Arc::new(Vec::new())),
            embedder,
        }
    }

    /// Create a store and load the corpus immediately.
    pub fn open(path: impl Into<PathBuf>, embedder: LoreEmbedder) -> Self {
        let store = Self::new(path, embedder);
        store.load();
        store
    }

    /// The corpus file path this store reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// (Re)load the corpus from disk, fully replacing the in-memory set.
    ///
    /// A missing file or a failed parse leaves an empty corpus, never a
    /// stale or partial one. Safe to call again at any time; the file
    /// watcher funnels through this same entry point.
    pub fn load(&self) {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "lore corpus not found at {}; set {} or run `lorekeep embed`",
                    self.path.display(),
                    crate::config::CORPUS_PATH_ENV
                );
                self.replace(Vec::new());
                return;
            }
            Err(e) => {
                error!("failed to read lore corpus {}: {e}", self.path.display());
                self.replace(Vec::new());
                return;
            }
        };
        match parse_corpus(&raw) {
            Ok(chunks) => {
                info!("loaded {} lore chunks from {}", chunks.len(), self.path.display());
                self.replace(chunks);
            }
            Err(e) => {
                error!("failed to parse lore corpus {}: {e}", self.path.display());
                self.replace(Vec::new());
            }
        }
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Retrieve up to `max(1, top_k)` lore texts most similar to `query`,
    /// most similar first. Only strictly positive scores count as relevant;
    /// an empty corpus or a no-match query yields an empty list.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Vec<String> {
        self.retrieve_scored(query, top_k)
            .await
            .into_iter()
            .map(|(text, _)| text)
            .collect()
    }

    /// Like [`retrieve`](Self::retrieve) but keeps the similarity scores.
    /// Used for diagnostics; the dialogue endpoint only sees texts.
    pub async fn retrieve_scored(&self, query: &str, top_k: usize) -> Vec<(String, f32)> {
        let corpus = self.snapshot();
        if corpus.is_empty() {
            return Vec::new();
        }
        let keep = top_k.max(1);

        let batch = [query.to_string()];
        let query_vec = self
            .embedder
            .embed(&batch)
            .await
            .and_then(|mut vecs| (!vecs.is_empty()).then(|| vecs.remove(0)));

        let scored = match query_vec {
            Some(q) => corpus
                .iter()
                .map(|c| (c.text.clone(), cosine(&q, &c.embedding)))
                .collect(),
            None => {
                warn!("embeddings unavailable; ranking lore by token overlap");
                let q_set: HashSet<String> = tokenize(query).into_iter().collect();
                corpus
                    .iter()
                    .map(|c| (c.text.clone(), lexical_overlap(&q_set, &c.text)))
                    .collect()
            }
        };
        rank(scored, keep)
    }

    fn snapshot(&self) -> Arc<Vec<LoreChunk>> {
        let slot = self.corpus.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&slot)
    }

    fn replace(&self, chunks: Vec<LoreChunk>) {
        let mut slot = self.corpus.write().unwrap_or_else(|p| p.into_inner());
        *slot = Arc::new(chunks);
    }
}

/// Sort descending by score (stable, so ties keep corpus order), keep the
/// top `keep`, then drop anything non-finite or not strictly positive.
fn rank(mut scored: Vec<(String, f32)>, keep: usize) -> Vec<(String, f32)> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .take(keep)
        .filter(|(_, s)| s.is_finite() && *s > 0.0)
        .collect()
}

/// Dialogue-endpoint boundary rule: fold optional topic hints into the
/// query text before retrieval.
pub fn compose_query(message: &str, hint: &str) -> String {
    if hint.trim().is_empty() {
        message.to_string()
    } else {
        format!("{message}\n\nHints: {hint}")
    }
}
