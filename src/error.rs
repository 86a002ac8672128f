use thiserror::Error;

use crate::document::DocumentId;

/// Errors raised by the search server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Bad document id, malformed query word or invalid stop word.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The document is not present in the index.
    #[error("Document {0} not found")]
    NotFound(DocumentId),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SearchError::InvalidArgument(msg.into())
    }
}
