//! Lazily loaded details of the selected movie.

use std::sync::Arc;

use popcorn_api::{MovieDetail, MovieService};

use crate::slot::QuerySlot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    /// Id the state belongs to; `None` when nothing is selected.
    pub imdb_id: Option<String>,
    pub movie: Option<MovieDetail>,
    pub is_loading: bool,
}

/// Fetches [`MovieDetail`] for one selected movie at a time.
///
/// Failures are not surfaced: loading simply stops and `movie` stays empty.
pub struct DetailLoader<S> {
    service: Arc<S>,
    slot: QuerySlot<DetailState>,
}

impl<S: MovieService + 'static> DetailLoader<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            slot: QuerySlot::new(DetailState::default()),
        }
    }

    pub fn state(&self) -> DetailState {
        self.slot.snapshot()
    }

    /// Start loading `imdb_id`, abandoning any previous selection.
    pub fn load(&mut self, imdb_id: impl Into<String>) {
        let imdb_id = imdb_id.into();
        let service = Arc::clone(&self.service);
        let selected = imdb_id.clone();
        self.slot.start(
            move |state| {
                state.imdb_id = Some(selected);
                state.movie = None;
                state.is_loading = true;
            },
            move |ticket| async move {
                let outcome = tokio::select! {
                    _ = ticket.token().cancelled() => return,
                    result = service.get_movie(&imdb_id) => result,
                };
                match outcome {
                    Ok(movie) => {
                        ticket.apply(|state| {
                            state.movie = Some(movie);
                            state.is_loading = false;
                        });
                    }
                    Err(e) => {
                        tracing::debug!(imdb_id = %imdb_id, error = %e, "Detail fetch failed");
                        ticket.apply(|state| state.is_loading = false);
                    }
                }
            },
        );
    }

    /// Drop the selection and cancel its request.
    pub fn clear(&mut self) {
        self.slot.reset(|state| *state = DetailState::default());
    }

    pub async fn settled(&mut self) {
        self.slot.settled().await;
    }
}
