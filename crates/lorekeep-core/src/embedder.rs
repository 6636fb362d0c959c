//! Local embedding provider. Wraps fastembed (ONNX runtime) with a simple
//! batch API: texts in, vectors out, `None` on any failure.
//!
//! The model loads lazily on the first call and is reused for the process
//! lifetime; a failed load is cached so later calls return `None` without
//! retrying. Callers must treat `None` as "embeddings unavailable" and fall
//! back, never crash.

use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// MiniLM-L6-v2: 384-dim vectors, mean pooling per the model config.
/// Dimension-compatible with corpora embedded by sentence-transformers'
/// all-MiniLM-L6-v2.
pub const EMBED_MODEL_NAME: &str = "all-MiniLM-L6-v2";
pub const EMBEDDING_DIM: usize = 384;

/// Set to `1` to disable embedding entirely (retrieval then uses its
/// lexical fallback). Useful offline and in tests.
pub const NO_EMBED_ENV: &str = "LOREKEEP_NO_EMBED";

type SharedModel = Arc<Mutex<TextEmbedding>>;

/// Lazily-initialized embedding provider. Cheap to construct; the model
/// itself loads on first [`embed`](Self::embed) call only, guarded so
/// concurrent first calls share one load.
pub struct LoreEmbedder {
    model: OnceCell<Option<SharedModel>>,
    disabled: bool,
}

impl LoreEmbedder {
    /// Create a provider. Honors [`NO_EMBED_ENV`].
    pub fn new() -> Self {
        let disabled = std::env::var(NO_EMBED_ENV).map(|v| v == "1").unwrap_or(false);
        if disabled {
            info!("embeddings disabled ({NO_EMBED_ENV}=1)");
        }
        Self {
            model: OnceCell::new(),
            disabled,
        }
    }

    /// Create a provider that always reports embeddings unavailable.
    /// Exercises callers' fallback paths without a model download.
    pub fn disabled() -> Self {
        Self {
            model: OnceCell::new(),
            disabled: true,
        }
    }

    /// Embed a batch of texts. Returns one vector per input, in input order,
    /// each [`EMBEDDING_DIM`] long — or `None` if the input is empty, the
    /// model failed to load, or inference failed. Never panics or errors.
    pub async fn embed(&self, texts: &[String]) -> Option<Vec<Vec<f32>>> {
        if self.disabled || texts.is_empty() {
            return None;
        }
        let model = self
            .model
            .get_or_init(|| async {
                match tokio::task::spawn_blocking(load_model).await {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("embedding model load task failed: {e}");
                        None
                    }
                }
            })
            .await
            .clone()?;

        let batch = texts.to_vec();
        let result = tokio::task::spawn_blocking(move || {
            // TextEmbedding::embed needs &mut self, hence the Mutex.
            let mut m = model.lock().unwrap_or_else(|p| p.into_inner());
            m.embed(batch, None)
        })
        .await;

        match result {
            Ok(Ok(vectors)) => Some(vectors),
            Ok(Err(e)) => {
                warn!("embedding inference failed: {e}");
                None
            }
            Err(e) => {
                warn!("embedding task panicked: {e}");
                None
            }
        }
    }
}

impl Default for LoreEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

fn load_model() -> Option<SharedModel> {
    let opts = InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
    match TextEmbedding::try_new(opts) {
        Ok(m) => {
            info!("embedding model {EMBED_MODEL_NAME} loaded");
            Some(Arc::new(Mutex::new(m)))
        }
        Err(e) => {
            warn!("embedding model unavailable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_provider_returns_none() {
        let e = LoreEmbedder::disabled();
        assert!(e.embed(&["hello".to_string()]).await.is_none());
    }

    #[tokio::test]
    async fn empty_batch_returns_none() {
        let e = LoreEmbedder::disabled();
        assert!(e.embed(&[]).await.is_none());
    }
}
