use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::config::{ExecutionMode, SearchConfig};
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::Result;
use crate::index::{IndexStats, InvertedIndex, Term};
use crate::matcher;
use crate::query::Query;
use crate::ranking::{self, status_is, DocumentPredicate};
use crate::tokenizer::StopWords;

/// Main search server
///
/// Cheap to share between threads: queries take a read lock on the index,
/// additions and removals take the write lock.
pub struct SearchServer {
    stop_words: StopWords,
    index: RwLock<InvertedIndex>,
    config: SearchConfig,
}

impl SearchServer {
    /// Create a server from space separated stop words
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Ok(Self::with_stop_words(StopWords::from_text(stop_words_text)?))
    }

    /// Create a server from a collection of stop words
    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_stop_words(StopWords::new(stop_words)?))
    }

    pub fn with_stop_words(stop_words: StopWords) -> Self {
        Self::with_config(stop_words, SearchConfig::default())
    }

    pub fn with_config(stop_words: StopWords, config: SearchConfig) -> Self {
        Self {
            stop_words,
            index: RwLock::new(InvertedIndex::new()),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Insert a document
    pub fn add_document(
        &self,
        id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        let mut index = self.index.write();
        if let Err(err) = index.add_document(id, text, status, ratings, &self.stop_words) {
            tracing::warn!("rejected document {}: {}", id, err);
            return Err(err);
        }
        tracing::debug!(
            "added document {} ({} terms indexed)",
            id,
            index.word_frequencies(id).len()
        );
        Ok(())
    }

    /// Delete a document. Unknown ids are ignored.
    pub fn remove_document(&self, mode: ExecutionMode, id: DocumentId) {
        let removed = self.index.write().remove_document(mode, id);
        tracing::debug!("remove document {} ({:?}): removed={}", id, mode, removed);
    }

    /// Top documents accepted by `predicate`
    pub fn find_top_documents_by<P: DocumentPredicate>(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>> {
        let query = Query::parse(raw_query, &self.stop_words)?;
        if query.plus_words.is_empty() {
            return Ok(Vec::new());
        }

        let index = self.index.read();
        let documents = ranking::find_top_documents(&index, &query, &predicate, mode, &self.config);
        tracing::debug!(
            "query {:?} ({:?}) returned {} documents",
            raw_query,
            mode,
            documents.len()
        );
        Ok(documents)
    }

    /// Top documents with the given status
    pub fn find_top_documents_with_status(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by(mode, raw_query, status_is(status))
    }

    /// Top documents with status `Actual`
    pub fn find_top_documents(&self, mode: ExecutionMode, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status(mode, raw_query, DocumentStatus::Actual)
    }

    /// Plus words of the query found in the document, empty if a minus word is found.
    ///
    /// Returns `NotFound` for ids that are not indexed.
    pub fn match_document<'q>(
        &self,
        mode: ExecutionMode,
        raw_query: &'q str,
        id: DocumentId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let index = self.index.read();
        matcher::match_document(&index, &query, id, mode)
    }

    /// Term frequencies of a document, empty for unknown ids.
    pub fn word_frequencies(&self, id: DocumentId) -> BTreeMap<Term, f64> {
        self.index.read().word_frequencies(id).clone()
    }

    pub fn document_count(&self) -> usize {
        self.index.read().document_count()
    }

    /// Lazy iterator over live document ids in ascending order.
    ///
    /// Each step takes the read lock only long enough to find the next id,
    /// so documents added or removed ahead of the cursor are seen.
    pub fn document_ids(&self) -> DocumentIds<'_> {
        DocumentIds {
            server: self,
            next: Some(DocumentId::MIN),
        }
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        self.index.read().stats()
    }
}

/// Cursor over the live ids of a [`SearchServer`]
#[derive(Clone)]
pub struct DocumentIds<'a> {
    server: &'a SearchServer,
    next: Option<DocumentId>,
}

impl Iterator for DocumentIds<'_> {
    type Item = DocumentId;

    fn next(&mut self) -> Option<DocumentId> {
        let id = self.server.index.read().next_document_id(self.next?)?;
        self.next = id.checked_add(1);
        Some(id)
    }
}

impl<'a> IntoIterator for &'a SearchServer {
    type Item = DocumentId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids()
    }
}
