use std::collections::VecDeque;

use crate::config::ExecutionMode;
use crate::document::{Document, DocumentStatus};
use crate::engine::SearchServer;
use crate::error::Result;
use crate::ranking::DocumentPredicate;

/// Number of most recent requests kept in the window.
pub const REQUEST_WINDOW: usize = 1440;

/// Records search requests and counts how many of the most recent ones
/// returned nothing.
pub struct RequestQueue<'a> {
    server: &'a SearchServer,
    requests: VecDeque<bool>,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(server: &'a SearchServer) -> Self {
        Self {
            server,
            requests: VecDeque::with_capacity(REQUEST_WINDOW),
            no_result_requests: 0,
        }
    }

    pub fn add_find_request_by<P: DocumentPredicate>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>> {
        let result = self
            .server
            .find_top_documents_by(ExecutionMode::Sequential, raw_query, predicate)?;
        self.record(result.is_empty());
        Ok(result)
    }

    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let result = self
            .server
            .find_top_documents_with_status(ExecutionMode::Sequential, raw_query, status)?;
        self.record(result.is_empty());
        Ok(result)
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Requests within the window that returned no documents.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    fn record(&mut self, no_result: bool) {
        if self.requests.len() == REQUEST_WINDOW {
            if let Some(true) = self.requests.pop_front() {
                self.no_result_requests -= 1;
            }
        }
        if no_result {
            self.no_result_requests += 1;
        }
        self.requests.push_back(no_result);
    }
}
