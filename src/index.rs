use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::ExecutionMode;
use crate::document::{DocumentData, DocumentId, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::tokenizer::StopWords;

/// Interned index term, shared between the postings and the per-document maps.
pub type Term = Arc<str>;

/// Term -> frequency of that term within one document.
pub type WordFrequencies = BTreeMap<Term, f64>;

/// Document id -> frequency of one term within that document.
pub type Postings = BTreeMap<DocumentId, f64>;

static EMPTY_FREQUENCIES: WordFrequencies = BTreeMap::new();

/// Inverted index and document store.
///
/// `word_to_document_freqs` and `document_to_word_freqs` are kept as exact
/// transposes of each other. A term is present only while at least one live
/// document contains it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvertedIndex {
    word_to_document_freqs: BTreeMap<Term, Postings>,
    document_to_word_freqs: BTreeMap<DocumentId, WordFrequencies>,
    documents: BTreeMap<DocumentId, DocumentData>,
    document_ids: BTreeSet<DocumentId>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to the index
    ///
    /// Fails for negative or already present ids and for words holding
    /// control characters. Nothing is modified on failure.
    pub fn add_document(
        &mut self,
        id: DocumentId,
        text: &str,
        status: DocumentStatus,
        ratings: &[i32],
        stop_words: &StopWords,
    ) -> Result<()> {
        if id < 0 {
            return Err(SearchError::invalid_argument(format!(
                "document id {} is negative",
                id
            )));
        }
        if self.documents.contains_key(&id) {
            return Err(SearchError::invalid_argument(format!(
                "document id {} already exists",
                id
            )));
        }
        let words = stop_words.split_no_stop(text)?;

        let mut frequencies = WordFrequencies::new();
        let inv_word_count = 1.0 / words.len() as f64;
        for word in words {
            let term = match frequencies.get_key_value(word) {
                Some((term, _)) => Arc::clone(term),
                None => self.intern(word),
            };
            *frequencies.entry(term).or_insert(0.0) += inv_word_count;
        }

        for (term, &freq) in &frequencies {
            self.word_to_document_freqs
                .entry(Arc::clone(term))
                .or_default()
                .insert(id, freq);
        }
        if !frequencies.is_empty() {
            self.document_to_word_freqs.insert(id, frequencies);
        }
        self.documents
            .insert(id, DocumentData::new(text.to_string(), status, ratings));
        self.document_ids.insert(id);

        Ok(())
    }

    fn intern(&self, word: &str) -> Term {
        match self.word_to_document_freqs.get_key_value(word) {
            Some((term, _)) => Arc::clone(term),
            None => Arc::from(word),
        }
    }

    /// Remove a document from the index. Returns `false` if it was not present.
    ///
    /// Both modes leave the index in the same state.
    pub fn remove_document(&mut self, mode: ExecutionMode, id: DocumentId) -> bool {
        if !self.document_ids.remove(&id) {
            return false;
        }
        let words = self.document_to_word_freqs.remove(&id).unwrap_or_default();

        match mode {
            ExecutionMode::Sequential => {
                for term in words.keys() {
                    if let Some(docs) = self.word_to_document_freqs.get_mut(term) {
                        docs.remove(&id);
                        if docs.is_empty() {
                            self.word_to_document_freqs.remove(term);
                        }
                    }
                }
            }
            ExecutionMode::Parallel => {
                let touched: Vec<(Term, Postings)> = words
                    .keys()
                    .filter_map(|term| self.word_to_document_freqs.remove_entry(term))
                    .collect();

                let kept: Vec<(Term, Postings)> = touched
                    .into_par_iter()
                    .filter_map(|(term, mut docs)| {
                        docs.remove(&id);
                        (!docs.is_empty()).then_some((term, docs))
                    })
                    .collect();

                self.word_to_document_freqs.extend(kept);
            }
        }

        self.documents.remove(&id);
        true
    }

    /// Term frequencies of a document, empty if it is not indexed.
    pub fn word_frequencies(&self, id: DocumentId) -> &WordFrequencies {
        self.document_to_word_freqs
            .get(&id)
            .unwrap_or(&EMPTY_FREQUENCIES)
    }

    /// Documents containing `term`
    pub fn postings(&self, term: &str) -> Option<&Postings> {
        self.word_to_document_freqs.get(term)
    }

    /// ln(live documents / documents containing the term), `None` for unknown terms.
    pub fn inverse_document_freq(&self, term: &str) -> Option<f64> {
        self.postings(term)
            .map(|docs| (self.document_count() as f64 / docs.len() as f64).ln())
    }

    pub fn document(&self, id: DocumentId) -> Option<&DocumentData> {
        self.documents.get(&id)
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.document_ids.contains(&id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Live document ids in ascending order
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.document_ids.iter().copied()
    }

    /// Smallest live id not below `from`
    pub fn next_document_id(&self, from: DocumentId) -> Option<DocumentId> {
        self.document_ids.range(from..).next().copied()
    }

    pub fn term_count(&self) -> usize {
        self.word_to_document_freqs.len()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total_documents: self.document_count(),
            total_terms: self.word_to_document_freqs.len(),
            avg_docs_per_term: if self.word_to_document_freqs.is_empty() {
                0.0
            } else {
                self.word_to_document_freqs
                    .values()
                    .map(|docs| docs.len())
                    .sum::<usize>() as f64
                    / self.word_to_document_freqs.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_terms: usize,
    pub avg_docs_per_term: f64,
}
