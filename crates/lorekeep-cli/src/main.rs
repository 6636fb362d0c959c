//! CLI entry point for Lorekeep: the corpus embedding tool plus dev commands.

use std::path::PathBuf;

use clap::Parser;
use lorekeep_core::{
    app_data_dir, build_corpus, compose_query, corpus_path, status, LoreEmbedder, LoreStore,
    DEFAULT_CHUNK_WORDS, DEFAULT_TOP_K,
};

#[derive(Parser)]
#[command(name = "lorekeep")]
#[command(about = "Lorekeep: lore embedding and retrieval for NPC dialogue")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show backend status, resolved corpus path, and loaded chunk count.
    Status,
    /// Show where Lorekeep stores its config and default corpus (app data directory).
    DataDir,
    /// Chunk and embed a lore document into the corpus file.
    Embed {
        /// UTF-8 lore text file to embed.
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        /// Words per chunk.
        #[arg(long, default_value_t = DEFAULT_CHUNK_WORDS)]
        chunk_words: usize,
        /// Output corpus path. Defaults to the configured corpus location.
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Retrieve lore for a query against the configured corpus (for dev).
    Query {
        /// The query text (e.g. a player message).
        #[arg(value_name = "TEXT")]
        text: String,
        /// Optional topic hint keywords folded into the query.
        #[arg(long)]
        hint: Option<String>,
        /// Number of results to return.
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Status) {
        Commands::Status => {
            let store = LoreStore::open(corpus_path(), LoreEmbedder::new());
            println!("Lorekeep backend");
            println!("  core: {}", status());
            println!("  corpus: {}", store.path().display());
            println!("  chunks: {}", store.len());
        }
        Commands::DataDir => match app_data_dir() {
            Some(p) => println!("{}", p.display()),
            None => eprintln!("Could not determine app data directory."),
        },
        Commands::Embed {
            source,
            chunk_words,
            out,
        } => {
            let out = out.unwrap_or_else(corpus_path);
            let embedder = LoreEmbedder::new();
            match build_corpus(&source, &out, Some(chunk_words), &embedder).await {
                Ok(n) => println!("Embedded {} chunk(s) into {}", n, out.display()),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Query { text, hint, top_k } => {
            let store = LoreStore::open(corpus_path(), LoreEmbedder::new());
            let query = compose_query(&text, hint.as_deref().unwrap_or(""));
            let results = store.retrieve_scored(&query, top_k).await;
            if results.is_empty() {
                println!("No lore retrieved.");
            } else {
                for (i, (text, score)) in results.iter().enumerate() {
                    let preview = if text.len() > 120 {
                        format!("{}...", &text[..120])
                    } else {
                        text.clone()
                    };
                    println!("{}. [{:.3}] {}", i + 1, score, preview);
                }
            }
        }
    }
}
