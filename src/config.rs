use serde::{Deserialize, Serialize};

/// Default number of documents returned by a search.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// Default number of accumulator buckets used by parallel ranking.
pub const DEFAULT_SHARD_COUNT: usize = 3;

/// Relevance values closer than this are considered equal when sorting.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// How an operation distributes its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Single thread, deterministic order.
    #[default]
    Sequential,
    /// Work split across the rayon pool.
    Parallel,
}

/// Search server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of documents returned by a search.
    pub max_results: usize,
    /// Bucket count of the accumulator used in parallel mode.
    pub shard_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULT_DOCUMENT_COUNT,
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }
}

impl SearchConfig {
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SearchConfig::from_json_str(r#"{ "shard_count": 8 }"#).unwrap();
        assert_eq!(config.shard_count, 8);
        assert_eq!(config.max_results, MAX_RESULT_DOCUMENT_COUNT);

        let config = SearchConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SearchConfig::default());
    }

    #[test]
    fn test_bad_json() {
        assert!(SearchConfig::from_json_str(r#"{ "max_results": "many" }"#).is_err());
    }
}
