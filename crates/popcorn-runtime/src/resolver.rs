//! Search-as-you-type over a [`MovieService`].

use std::sync::Arc;

use popcorn_api::{MovieService, MovieSummary};

use crate::slot::QuerySlot;

/// Queries shorter than this never reach the network.
pub const DEFAULT_MIN_QUERY_LEN: usize = 3;

/// What the result list shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub results: Vec<MovieSummary>,
    pub is_loading: bool,
    /// User-facing message of the last failed search.
    pub error: Option<String>,
}

/// Resolves the current query into [`SearchState`].
///
/// Each query change cancels the request for the previous query; only the
/// newest request can ever write results.
pub struct SearchResolver<S> {
    service: Arc<S>,
    min_query_len: usize,
    query: String,
    slot: QuerySlot<SearchState>,
}

impl<S: MovieService + 'static> SearchResolver<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
            query: String::new(),
            slot: QuerySlot::new(SearchState::default()),
        }
    }

    pub fn with_min_query_len(mut self, min_query_len: usize) -> Self {
        self.min_query_len = min_query_len;
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SearchState {
        self.slot.snapshot()
    }

    /// Replace the query. Spawns a search task unless the query is too short
    /// or unchanged.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query == self.query {
            return;
        }
        self.query = query;

        if self.query.chars().count() < self.min_query_len {
            self.slot.reset(|state| {
                state.results.clear();
                state.error = None;
                state.is_loading = false;
            });
            return;
        }

        let service = Arc::clone(&self.service);
        let query = self.query.clone();
        self.slot.start(
            |state| {
                state.is_loading = true;
                state.error = None;
            },
            move |ticket| async move {
                let outcome = tokio::select! {
                    _ = ticket.token().cancelled() => None,
                    result = service.search_movies(&query) => Some(result),
                };

                let applied = match outcome {
                    None => {
                        tracing::debug!(query = %query, "Search cancelled");
                        return;
                    }
                    Some(Ok(results)) => {
                        tracing::debug!(query = %query, count = results.len(), "Search finished");
                        ticket.apply(|state| {
                            state.results = results;
                            state.is_loading = false;
                        })
                    }
                    Some(Err(e)) => {
                        tracing::debug!(query = %query, error = %e, "Search failed");
                        ticket.apply(|state| {
                            state.results.clear();
                            state.error = Some(e.user_message());
                            state.is_loading = false;
                        })
                    }
                };
                if !applied {
                    tracing::debug!(query = %query, "Discarded superseded search response");
                }
            },
        );
    }

    /// Wait until the current search (if any) has settled.
    pub async fn settled(&mut self) {
        self.slot.settled().await;
    }
}
