use rayon::prelude::*;

use crate::config::ExecutionMode;
use crate::document::{DocumentId, DocumentStatus};
use crate::error::{Result, SearchError};
use crate::index::InvertedIndex;
use crate::query::Query;

fn document_has(index: &InvertedIndex, word: &str, id: DocumentId) -> bool {
    index
        .postings(word)
        .is_some_and(|docs| docs.contains_key(&id))
}

/// Plus words of `query` found in document `id`, in ascending order.
///
/// The list is empty when any minus word occurs in the document. Fails with
/// `NotFound` when the document is not indexed.
pub fn match_document<'q>(
    index: &InvertedIndex,
    query: &Query<'q>,
    id: DocumentId,
    mode: ExecutionMode,
) -> Result<(Vec<&'q str>, DocumentStatus)> {
    let status = index
        .document(id)
        .map(|data| data.status)
        .ok_or(SearchError::NotFound(id))?;

    let (mut matched, excluded) = match mode {
        ExecutionMode::Sequential => {
            let matched: Vec<&'q str> = query
                .plus_words
                .iter()
                .copied()
                .filter(|word| document_has(index, word, id))
                .collect();
            let excluded = query
                .minus_words
                .iter()
                .any(|word| document_has(index, word, id));
            (matched, excluded)
        }
        ExecutionMode::Parallel => {
            let matched: Vec<&'q str> = query
                .plus_words
                .par_iter()
                .copied()
                .filter(|word| document_has(index, word, id))
                .collect();
            let excluded = query
                .minus_words
                .par_iter()
                .any(|word| document_has(index, word, id));
            (matched, excluded)
        }
    };

    if excluded {
        matched.clear();
    }
    Ok((matched, status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::StopWords;

    fn check_both<'q>(
        index: &InvertedIndex,
        query: &Query<'q>,
        id: DocumentId,
    ) -> Result<(Vec<&'q str>, DocumentStatus)> {
        let sequential = match_document(index, query, id, ExecutionMode::Sequential)?;
        let parallel = match_document(index, query, id, ExecutionMode::Parallel)?;
        assert_eq!(sequential, parallel);
        Ok(sequential)
    }

    #[test]
    fn test_matches_present_words() -> Result<()> {
        let stop_words = StopWords::from_text("in on")?;
        let mut index = InvertedIndex::new();
        index.add_document(0, "cat dog elephant", DocumentStatus::Irrelevant, &[0], &stop_words)?;
        let query = Query::parse("mouse dog sharp cat", &stop_words)?;
        let (words, status) = check_both(&index, &query, 0)?;
        assert_eq!(words, vec!["cat", "dog"]);
        assert_eq!(status, DocumentStatus::Irrelevant);
        Ok(())
    }

    #[test]
    fn test_minus_word_clears() -> Result<()> {
        let stop_words = StopWords::from_text("in on")?;
        let mut index = InvertedIndex::new();
        index.add_document(0, "", DocumentStatus::Actual, &[0], &stop_words)?;
        index.add_document(1, "hello world", DocumentStatus::Actual, &[0], &stop_words)?;
        index.add_document(2, "hello perfect world", DocumentStatus::Actual, &[0], &stop_words)?;

        let query = Query::parse("hello world -world", &stop_words)?;
        assert!(check_both(&index, &query, 1)?.0.is_empty());

        let query = Query::parse("hello world", &stop_words)?;
        assert_eq!(check_both(&index, &query, 1)?.0.len(), 2);
        assert!(check_both(&index, &query, 0)?.0.is_empty());

        let query = Query::parse("hello in -perfect", &stop_words)?;
        assert_eq!(check_both(&index, &query, 1)?.0, vec!["hello"]);
        assert!(check_both(&index, &query, 2)?.0.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_document() -> Result<()> {
        let stop_words = StopWords::default();
        let mut index = InvertedIndex::new();
        index.add_document(0, "hello", DocumentStatus::Actual, &[], &stop_words)?;
        let query = Query::parse("hello", &stop_words)?;
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            assert_eq!(
                match_document(&index, &query, 7, mode).unwrap_err(),
                SearchError::NotFound(7)
            );
        }
        Ok(())
    }
}
