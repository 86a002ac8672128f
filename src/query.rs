use std::collections::BTreeSet;

use crate::error::{Result, SearchError};
use crate::tokenizer::{is_valid_word, split_into_words, StopWords};

/// Parsed query. Words borrow from the raw query text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: BTreeSet<&'q str>,
    pub minus_words: BTreeSet<&'q str>,
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
    is_stop: bool,
}

impl<'q> Query<'q> {
    /// Parse a raw query. Words prefixed with `-` exclude documents.
    pub fn parse(text: &'q str, stop_words: &StopWords) -> Result<Self> {
        let mut query = Query::default();
        for word in split_into_words(text) {
            let word = parse_query_word(word, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.insert(word.data);
            } else {
                query.plus_words.insert(word.data);
            }
        }
        Ok(query)
    }

    pub fn is_empty(&self) -> bool {
        self.plus_words.is_empty() && self.minus_words.is_empty()
    }
}

fn parse_query_word<'q>(text: &'q str, stop_words: &StopWords) -> Result<QueryWord<'q>> {
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
        tracing::warn!("rejected query word {:?}", text);
        return Err(SearchError::invalid_argument(format!(
            "query word {:?} is invalid",
            text
        )));
    }
    Ok(QueryWord {
        data,
        is_minus,
        is_stop: stop_words.contains(data),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop_words() -> StopWords {
        StopWords::from_text("and with in").unwrap()
    }

    #[test]
    fn test_plus_and_minus() -> Result<()> {
        let stop_words = stop_words();
        let query = Query::parse("curly -nasty cat curly -nasty", &stop_words)?;
        assert_eq!(query.plus_words.into_iter().collect::<Vec<_>>(), vec!["cat", "curly"]);
        assert_eq!(query.minus_words.into_iter().collect::<Vec<_>>(), vec!["nasty"]);
        Ok(())
    }

    #[test]
    fn test_stop_words_dropped() -> Result<()> {
        let stop_words = stop_words();
        let query = Query::parse("hello in -with", &stop_words)?;
        assert_eq!(query.plus_words.len(), 1);
        assert!(query.minus_words.is_empty());

        let query = Query::parse("and with", &stop_words)?;
        assert!(query.is_empty());
        Ok(())
    }

    #[test]
    fn test_malformed_words() {
        let stop_words = stop_words();
        for raw in ["cat -", "--cat", "cat -- dog", "ca\x12t", "-\x02"] {
            assert!(
                matches!(Query::parse(raw, &stop_words), Err(SearchError::InvalidArgument(_))),
                "query {:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_inner_dash_is_fine() -> Result<()> {
        let query = Query::parse("well-known -semi-final", &stop_words())?;
        assert!(query.plus_words.contains("well-known"));
        assert!(query.minus_words.contains("semi-final"));
        Ok(())
    }
}
