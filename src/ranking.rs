use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::concurrent_map::ConcurrentMap;
use crate::config::{ExecutionMode, SearchConfig, RELEVANCE_EPSILON};
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::index::InvertedIndex;
use crate::query::Query;

/// Filter applied to every candidate: `(id, status, rating) -> keep`.
pub trait DocumentPredicate: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync {}

impl<F> DocumentPredicate for F where F: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync {}

/// Predicate keeping documents with the given status.
pub fn status_is(status: DocumentStatus) -> impl DocumentPredicate {
    move |_id: DocumentId, document_status: DocumentStatus, _rating: i32| document_status == status
}

fn accepts<P: DocumentPredicate>(index: &InvertedIndex, predicate: &P, id: DocumentId) -> bool {
    index
        .document(id)
        .is_some_and(|data| predicate(id, data.status, data.rating))
}

/// Score every document matching the query, in ascending id order.
pub fn find_all_documents<P: DocumentPredicate>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
    mode: ExecutionMode,
    shard_count: usize,
) -> Vec<Document> {
    let relevance = match mode {
        ExecutionMode::Sequential => accumulate_sequential(index, query, predicate),
        ExecutionMode::Parallel => accumulate_parallel(index, query, predicate, shard_count),
    };

    relevance
        .into_iter()
        .filter_map(|(id, relevance)| {
            index
                .document(id)
                .map(|data| Document::new(id, relevance, data.rating))
        })
        .collect()
}

fn accumulate_sequential<P: DocumentPredicate>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
) -> BTreeMap<DocumentId, f64> {
    let mut relevance = BTreeMap::new();

    for word in &query.plus_words {
        let (Some(docs), Some(idf)) = (index.postings(word), index.inverse_document_freq(word)) else {
            continue;
        };
        for (&id, &term_freq) in docs {
            if accepts(index, predicate, id) {
                *relevance.entry(id).or_insert(0.0) += term_freq * idf;
            }
        }
    }

    for word in &query.minus_words {
        if let Some(docs) = index.postings(word) {
            for id in docs.keys() {
                relevance.remove(id);
            }
        }
    }

    relevance
}

fn accumulate_parallel<P: DocumentPredicate>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
    shard_count: usize,
) -> BTreeMap<DocumentId, f64> {
    let relevance: ConcurrentMap<DocumentId, f64> = ConcurrentMap::new(shard_count);

    query.plus_words.par_iter().for_each(|word| {
        let (Some(docs), Some(idf)) = (index.postings(word), index.inverse_document_freq(word)) else {
            return;
        };
        for (&id, &term_freq) in docs {
            if accepts(index, predicate, id) {
                *relevance.access(id) += term_freq * idf;
            }
        }
    });

    query.minus_words.par_iter().for_each(|word| {
        if let Some(docs) = index.postings(word) {
            for id in docs.keys() {
                relevance.erase(id);
            }
        }
    });

    relevance.snapshot()
}

fn by_relevance(lhs: &Document, rhs: &Document) -> Ordering {
    rhs.relevance
        .total_cmp(&lhs.relevance)
        .then_with(|| rhs.rating.cmp(&lhs.rating))
        .then_with(|| lhs.id.cmp(&rhs.id))
}

/// Sort by descending relevance. Documents within `RELEVANCE_EPSILON` of the
/// head of their run are ordered by descending rating, then ascending id.
///
/// Runs are measured from their head, not chained through neighbours. Two
/// adjacent documents on either side of a run boundary can therefore be
/// closer than `RELEVANCE_EPSILON` and still be ordered by relevance alone.
/// Being within epsilon is not transitive, so no single order satisfies
/// every pair in general.
pub fn sort_documents(documents: &mut [Document], mode: ExecutionMode) {
    match mode {
        ExecutionMode::Sequential => documents.sort_by(by_relevance),
        ExecutionMode::Parallel => documents.par_sort_by(by_relevance),
    }

    let mut start = 0;
    while start < documents.len() {
        let head = documents[start].relevance;
        let end = documents[start..]
            .iter()
            .position(|doc| (head - doc.relevance).abs() >= RELEVANCE_EPSILON)
            .map_or(documents.len(), |offset| start + offset);
        documents[start..end]
            .sort_by(|lhs, rhs| rhs.rating.cmp(&lhs.rating).then_with(|| lhs.id.cmp(&rhs.id)));
        start = end;
    }
}

/// Find, sort and truncate to the configured number of results.
pub fn find_top_documents<P: DocumentPredicate>(
    index: &InvertedIndex,
    query: &Query<'_>,
    predicate: &P,
    mode: ExecutionMode,
    config: &SearchConfig,
) -> Vec<Document> {
    let mut documents = find_all_documents(index, query, predicate, mode, config.shard_count);
    sort_documents(&mut documents, mode);
    documents.truncate(config.max_results);
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::tokenizer::StopWords;

    fn sample(stop_words: &StopWords) -> Result<InvertedIndex> {
        let mut index = InvertedIndex::new();
        index.add_document(1, "white cat and yellow hat", DocumentStatus::Actual, &[8, -3], stop_words)?;
        index.add_document(2, "curly cat curly tail", DocumentStatus::Actual, &[7, 2, 7], stop_words)?;
        index.add_document(3, "nasty dog with big eyes", DocumentStatus::Banned, &[5, -12, 2, 1], stop_words)?;
        index.add_document(4, "nasty pigeon john", DocumentStatus::Actual, &[9], stop_words)?;
        Ok(index)
    }

    fn approx(lhs: f64, rhs: f64) -> bool {
        (lhs - rhs).abs() < 1e-9
    }

    #[test]
    fn test_tf_idf_values() -> Result<()> {
        let stop_words = StopWords::from_text("and with")?;
        let index = sample(&stop_words)?;
        let query = Query::parse("curly nasty cat", &stop_words)?;
        let all = |_: DocumentId, _: DocumentStatus, _: i32| true;
        let found = find_all_documents(&index, &query, &all, ExecutionMode::Sequential, 3);

        let ln2 = 2.0_f64.ln();
        let ln4 = 4.0_f64.ln();
        let ids: Vec<_> = found.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert!(approx(found[0].relevance, 0.25 * ln2));
        assert!(approx(found[1].relevance, 0.5 * ln4 + 0.25 * ln2));
        assert!(approx(found[2].relevance, 0.25 * ln2));
        assert!(approx(found[3].relevance, ln2 / 3.0));
        Ok(())
    }

    #[test]
    fn test_predicate_and_minus_words() -> Result<()> {
        let stop_words = StopWords::from_text("and with")?;
        let index = sample(&stop_words)?;
        let query = Query::parse("curly nasty cat -tail", &stop_words)?;
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            let found = find_all_documents(&index, &query, &status_is(DocumentStatus::Actual), mode, 3);
            let ids: Vec<_> = found.iter().map(|d| d.id).collect();
            assert_eq!(ids, vec![1, 4]);
        }
        Ok(())
    }

    #[test]
    fn test_minus_word_ignores_predicate() -> Result<()> {
        let stop_words = StopWords::default();
        let mut index = InvertedIndex::new();
        index.add_document(1, "cat dog", DocumentStatus::Actual, &[], &stop_words)?;
        index.add_document(2, "cat", DocumentStatus::Banned, &[], &stop_words)?;
        let query = Query::parse("cat -dog", &stop_words)?;
        let banned_only = status_is(DocumentStatus::Banned);
        let found = find_all_documents(&index, &query, &banned_only, ExecutionMode::Parallel, 2);
        assert_eq!(found.iter().map(|d| d.id).collect::<Vec<_>>(), vec![2]);
        Ok(())
    }

    #[test]
    fn test_sort_ties_by_rating() {
        let mut docs = vec![
            Document::new(1, 0.5, 1),
            Document::new(2, 0.5 + 1e-7, 3),
            Document::new(3, 0.9, 0),
            Document::new(4, 0.5 - 5e-7, 9),
            Document::new(5, 0.1, 4),
        ];
        sort_documents(&mut docs, ExecutionMode::Sequential);
        let ids: Vec<_> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![3, 4, 2, 1, 5]);

        let mut parallel = docs.clone();
        parallel.reverse();
        sort_documents(&mut parallel, ExecutionMode::Parallel);
        assert_eq!(parallel, docs);
    }

    #[test]
    fn test_runs_anchored_at_head() {
        let input = vec![
            Document::new(1, 1.0, 0),
            Document::new(2, 1.0 - 5e-7, 0),
            Document::new(3, 1.0 - 1.1e-6, 10),
        ];
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            let mut docs = input.clone();
            docs.reverse();
            sort_documents(&mut docs, mode);
            // 3 is more than epsilon below the head of the first run, so it
            // starts its own run even though it is close to 2.
            assert_eq!(docs.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_truncated_to_max_results() -> Result<()> {
        let stop_words = StopWords::default();
        let mut index = InvertedIndex::new();
        for id in 0..20 {
            let text = format!("common word{}", id);
            index.add_document(id, &text, DocumentStatus::Actual, &[id], &stop_words)?;
        }
        index.add_document(20, "other", DocumentStatus::Actual, &[], &stop_words)?;
        let query = Query::parse("common", &stop_words)?;
        let config = SearchConfig::default();
        let all = |_: DocumentId, _: DocumentStatus, _: i32| true;
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            let top = find_top_documents(&index, &query, &all, mode, &config);
            assert_eq!(top.len(), config.max_results);
            // Equal relevance everywhere, so ratings decide.
            assert_eq!(top.iter().map(|d| d.id).collect::<Vec<_>>(), vec![19, 18, 17, 16, 15]);
        }
        Ok(())
    }
}
