// Re-export main components
pub mod concurrent_map;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod index;
pub mod matcher;
pub mod process_queries;
pub mod query;
pub mod ranking;
pub mod request_queue;
pub mod tokenizer;

// Re-export commonly used types
pub use concurrent_map::ConcurrentMap;
pub use config::{ExecutionMode, SearchConfig, MAX_RESULT_DOCUMENT_COUNT};
pub use document::{Document, DocumentId, DocumentStatus};
pub use engine::{DocumentIds, SearchServer};
pub use index::InvertedIndex;
pub use process_queries::{process_queries, process_queries_joined};
pub use query::Query;
pub use request_queue::RequestQueue;
pub use tokenizer::StopWords;

// Re-export error types
pub use error::{Result, SearchError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
