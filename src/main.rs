use anyhow::{Context, Result};
use clap::Parser;
use docsearch::{
    DocumentId, DocumentStatus, ExecutionMode, SearchConfig, SearchServer, StopWords,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "In-memory TF-IDF document search", long_about = None)]
struct Args {
    /// Space separated stop words
    #[arg(short, long, default_value = "and with")]
    stop_words: String,

    /// Use the built-in English stop word list instead of --stop-words
    #[arg(long)]
    english_stop_words: bool,

    /// JSON file holding an array of {id, text, status, ratings}
    #[arg(short, long)]
    docs: Option<PathBuf>,

    #[arg(short, long, default_value = "curly nasty cat")]
    query: String,

    /// Only return documents with this status
    #[arg(long, value_enum, ignore_case = true, default_value_t = DocumentStatus::Actual)]
    status: DocumentStatus,

    /// Run ranking, matching and removal on the rayon pool
    #[arg(short, long)]
    parallel: bool,

    /// Show which query words match this document
    #[arg(short, long)]
    match_id: Option<DocumentId>,

    /// Remove these documents before searching
    #[arg(short, long)]
    remove: Vec<DocumentId>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

// Document as read from the input file
#[derive(Debug, Deserialize)]
struct DocumentInput {
    id: DocumentId,
    text: String,
    #[serde(default)]
    status: DocumentStatus,
    #[serde(default)]
    ratings: Vec<i32>,
}

fn demo_documents() -> Vec<DocumentInput> {
    [
        "white cat and yellow hat",
        "curly cat curly tail",
        "nasty dog with big eyes",
        "nasty pigeon john",
    ]
    .iter()
    .zip(1..)
    .map(|(text, id)| DocumentInput {
        id,
        text: text.to_string(),
        status: DocumentStatus::Actual,
        ratings: vec![1, 2],
    })
    .collect()
}

fn load_documents(path: &Path) -> Result<Vec<DocumentInput>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read documents from {}", path.display()))?;
    serde_json::from_str(&json).context("Failed to parse documents")
}

fn load_config(path: &Path) -> Result<SearchConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    SearchConfig::from_json_str(&json).context("Failed to parse config")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mode = if args.parallel {
        ExecutionMode::Parallel
    } else {
        ExecutionMode::Sequential
    };

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SearchConfig::default(),
    };
    let stop_words = if args.english_stop_words {
        StopWords::english()
    } else {
        StopWords::from_text(&args.stop_words).context("Invalid stop words")?
    };
    let server = SearchServer::with_config(stop_words, config);

    let docs = match &args.docs {
        Some(path) => load_documents(path)?,
        None => demo_documents(),
    };

    let start = Instant::now();
    for doc in &docs {
        server
            .add_document(doc.id, &doc.text, doc.status, &doc.ratings)
            .with_context(|| format!("Failed to add document {}", doc.id))?;
    }
    tracing::info!("Indexed {} documents in {:?}", docs.len(), start.elapsed());

    for id in &args.remove {
        server.remove_document(mode, *id);
    }

    println!("Searching for: \"{}\" ({:?}, {:?})", args.query, args.status, mode);
    let start = Instant::now();
    let results = server.find_top_documents_with_status(mode, &args.query, args.status)?;
    let duration = start.elapsed();
    println!("Search found {} documents in {:?}", results.len(), duration);
    for document in &results {
        println!("{}", document);
    }

    if let Some(id) = args.match_id {
        let (words, status) = server.match_document(mode, &args.query, id)?;
        println!(
            "{{ document_id = {}, status = {:?}, words = {} }}",
            id,
            status,
            words.join(" ")
        );
    }

    let stats = server.stats();
    println!();
    println!("Total documents: {}", stats.total_documents);
    println!("Total unique terms: {}", stats.total_terms);
    println!("Average docs per term: {:.2}", stats.avg_docs_per_term);

    Ok(())
}
