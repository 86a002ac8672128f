use serde::{Deserialize, Serialize};
use std::fmt;

pub type DocumentId = i32;

/// Status tag attached to a document at insertion time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    #[default]
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

/// Scored search hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub relevance: f64,
    pub rating: i32,
}

impl Document {
    pub fn new(id: DocumentId, relevance: f64, rating: i32) -> Self {
        Self {
            id,
            relevance,
            rating,
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}

/// Stored document: owned text plus the metadata used for filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentData {
    pub text: String,
    pub status: DocumentStatus,
    pub rating: i32,
}

impl DocumentData {
    pub fn new(text: String, status: DocumentStatus, ratings: &[i32]) -> Self {
        Self {
            text,
            status,
            rating: average_rating(ratings),
        }
    }
}

/// Truncating integer average, 0 for no ratings.
pub fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    (sum / ratings.len() as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), 0);
        assert_eq!(average_rating(&[1, 2]), 1);
        assert_eq!(average_rating(&[7, 2, 7]), 5);
        assert_eq!(average_rating(&[-1, -2]), -1);
        assert_eq!(average_rating(&[i32::MAX, i32::MAX]), i32::MAX);
    }

    #[test]
    fn test_display() {
        let doc = Document::new(2, 0.5, 1);
        assert_eq!(doc.to_string(), "{ document_id = 2, relevance = 0.5, rating = 1 }");
    }

    #[test]
    fn test_status_value_enum() {
        use clap::ValueEnum;

        assert_eq!(DocumentStatus::from_str("BANNED", true), Ok(DocumentStatus::Banned));
        assert!(DocumentStatus::from_str("gone", true).is_err());
        let names: Vec<_> = DocumentStatus::value_variants()
            .iter()
            .filter_map(|status| status.to_possible_value())
            .map(|value| value.get_name().to_string())
            .collect();
        assert_eq!(names, ["actual", "irrelevant", "banned", "removed"]);
    }
}
