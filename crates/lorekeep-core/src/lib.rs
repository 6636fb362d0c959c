//! All lore-retrieval logic independent of how the app is run (CLI or the
//! dialogue server).
//!
//! Lore source documents live wherever the operator keeps them; Lorekeep
//! stores only its config and the embedded corpus in its own app data
//! directory (see [app_data]). The dialogue server constructs one
//! [`LoreStore`] at startup and calls [`LoreStore::retrieve`] per turn.

pub mod app_data;
pub mod builder;
pub mod chunks;
pub mod config;
pub mod corpus;
pub mod embedder;
pub mod similarity;
pub mod store;
pub mod watcher;

pub use app_data::app_data_dir;
pub use builder::{build_corpus, BuildError};
pub use chunks::{chunk_words, DEFAULT_CHUNK_WORDS};
pub use config::{corpus_path, load_config, set_corpus_path, Config, ConfigError, CORPUS_PATH_ENV};
pub use corpus::LoreChunk;
pub use embedder::{LoreEmbedder, EMBEDDING_DIM, NO_EMBED_ENV};
pub use similarity::cosine;
pub use store::{compose_query, LoreStore, DEFAULT_TOP_K};
pub use watcher::{watch_corpus, CorpusWatcher, WatchError};

/// Returns a short status string. Used to verify the backend is wired up.
pub fn status() -> &'static str {
    "lorekeep-core ready"
}
