//! File watcher for the lore corpus. Reloads the store when the backing
//! JSON changes on disk (useful in dev, where the operator re-runs the
//! embed tool while the server stays up).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use notify_debouncer_mini::notify;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use tracing::{info, warn};

use crate::store::LoreStore;

/// Keeps the underlying watcher alive; dropping it stops watching. The
/// store keeps working without it, it just won't see file changes.
pub struct CorpusWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
}

/// Watches the corpus file's directory and calls `store.load()` whenever the
/// corpus file changes (debounced). Watching the directory rather than the
/// file itself keeps the subscription alive across the builder's
/// write-then-rename replacement.
pub fn watch_corpus(store: Arc<LoreStore>) -> Result<CorpusWatcher, WatchError> {
    let path = store.path().to_path_buf();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if !dir.is_dir() {
        return Err(WatchError::NotADirectory(dir));
    }

    let debounce = Duration::from_millis(400);
    let target = path.clone();
    let mut debouncer = new_debouncer(debounce, move |res: DebounceEventResult| match res {
        Ok(events) => {
            let touched = events
                .iter()
                .any(|e| e.path.file_name() == target.file_name());
            if touched {
                info!("lore corpus changed on disk; reloading");
                store.load();
            }
        }
        Err(e) => warn!("corpus watcher error: {e}"),
    })
    .map_err(|e| WatchError::Notify(e.to_string()))?;

    debouncer
        .watcher()
        .watch(&dir, notify::RecursiveMode::NonRecursive)
        .map_err(|e| WatchError::Watch(e.to_string()))?;

    Ok(CorpusWatcher {
        _debouncer: debouncer,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("watcher init: {0}")]
    Notify(String),
    #[error("watch failed: {0}")]
    Watch(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::LoreEmbedder;

    #[test]
    fn missing_directory_is_an_error() {
        let store = Arc::new(LoreStore::new(
            "/definitely/not/a/real/dir/lore.json",
            LoreEmbedder::disabled(),
        ));
        assert!(matches!(
            watch_corpus(store),
            Err(WatchError::NotADirectory(_))
        ));
    }

    #[test]
    fn reloads_when_corpus_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lore.json");
        std::fs::write(&path, "[]").unwrap();

        let store = Arc::new(LoreStore::open(&path, LoreEmbedder::disabled()));
        assert_eq!(store.len(), 0);
        let _watcher = watch_corpus(Arc::clone(&store)).unwrap();

        std::fs::write(
            &path,
            r#"[{"id": "chunk_0", "text": "new lore", "embedding": [0.1]}]"#,
        )
        .unwrap();

        // Debounce is 400ms; give the event time to arrive.
        for _ in 0..40 {
            if store.len() == 1 {
                return;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        panic!("store did not reload after corpus change");
    }
}
