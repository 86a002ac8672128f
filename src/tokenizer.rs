use std::collections::BTreeSet;

use crate::error::{Result, SearchError};

lazy_static::lazy_static! {
    static ref ENGLISH_STOPWORDS: Vec<&'static str> = vec![
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "could", "did", "do", "does", "doing", "down",
        "during", "each", "few", "for", "from", "further", "had", "has", "have",
        "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
        "i", "if", "in", "into", "is", "it", "its", "itself", "me", "more", "most", "my",
        "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
        "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should", "so",
        "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves",
        "then", "there", "these", "they", "this", "those", "through", "to", "too",
        "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
        "which", "while", "who", "whom", "why", "with", "would", "you", "your", "yours",
        "yourself", "yourselves",
    ];
}

/// Split text into words separated by spaces, borrowing from the input.
pub fn split_into_words(text: &str) -> Vec<&str> {
    text.split(' ').filter(|word| !word.is_empty()).collect()
}

/// Owned variant of [`split_into_words`].
pub fn split_into_words_owned(text: &str) -> Vec<String> {
    split_into_words(text)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// A word is valid when it holds no control characters (code points below 0x20).
pub fn is_valid_word(word: &str) -> bool {
    !word.chars().any(|c| c < ' ')
}

/// Immutable set of words that are never indexed or matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: BTreeSet<String>,
}

impl StopWords {
    /// Build from any collection of words. Empty strings are skipped.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if word.is_empty() {
                continue;
            }
            if !is_valid_word(word) {
                return Err(SearchError::invalid_argument(format!(
                    "stop word {:?} contains control characters",
                    word
                )));
            }
            set.insert(word.to_string());
        }
        Ok(Self { words: set })
    }

    /// Build from space separated text.
    pub fn from_text(text: &str) -> Result<Self> {
        Self::new(split_into_words(text))
    }

    /// Built-in English stop words.
    pub fn english() -> Self {
        Self {
            words: ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Split document text into indexable words: every word is validated and
    /// stop words are removed.
    pub fn split_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::invalid_argument(format!(
                    "word {:?} contains control characters",
                    word
                )));
            }
            if !self.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}
