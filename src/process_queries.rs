use rayon::prelude::*;

use crate::config::ExecutionMode;
use crate::document::Document;
use crate::engine::SearchServer;
use crate::error::Result;

/// Run every query on the rayon pool. Results keep the order of `queries`;
/// the first failing query aborts the batch.
pub fn process_queries<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Vec<Document>>>
where
    S: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| server.find_top_documents(ExecutionMode::Sequential, query.as_ref()))
        .collect()
}

/// Same as [`process_queries`], flattened into one list.
pub fn process_queries_joined<S>(server: &SearchServer, queries: &[S]) -> Result<Vec<Document>>
where
    S: AsRef<str> + Sync,
{
    Ok(process_queries(server, queries)?
        .into_iter()
        .flatten()
        .collect())
}
