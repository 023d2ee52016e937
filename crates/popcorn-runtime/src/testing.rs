//! In-process movie service for runtime tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use popcorn_api::{ApiError, MovieDetail, MovieService, MovieSummary};

/// Answers searches from canned data after a per-query delay.
///
/// Queries starting with "zzz" are not found; "broken" fails like a 500.
#[derive(Default)]
pub struct FakeService {
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    delays: Mutex<HashMap<String, Duration>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay the response to `key` (a query or an IMDb id).
    pub fn delay(self, key: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(key.to_string(), delay);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn delay_for(&self, key: &str) -> Duration {
        self.delays
            .lock()
            .unwrap()
            .get(key)
            .copied()
            .unwrap_or(Duration::from_millis(50))
    }
}

pub fn summary(imdb_id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "2005".to_string(),
        poster: "N/A".to_string(),
    }
}

pub fn detail(imdb_id: &str) -> MovieDetail {
    MovieDetail {
        imdb_id: imdb_id.to_string(),
        title: format!("Title {imdb_id}"),
        poster: "N/A".to_string(),
        runtime: "120 min".to_string(),
        imdb_rating: Some(7.5),
        plot: "Plot".to_string(),
        released: "01 Jan 2005".to_string(),
        actors: "Someone".to_string(),
        director: "Someone Else".to_string(),
        genre: "Drama".to_string(),
    }
}

impl MovieService for FakeService {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, ApiError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay_for(query)).await;

        if query.starts_with("zzz") {
            return Err(ApiError::NotFound);
        }
        if query == "broken" {
            return Err(ApiError::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(vec![
            summary(&format!("{query}-1"), &format!("{query} one")),
            summary(&format!("{query}-2"), &format!("{query} two")),
        ])
    }

    async fn get_movie(&self, imdb_id: &str) -> Result<MovieDetail, ApiError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay_for(imdb_id)).await;

        if imdb_id == "tt-missing" {
            return Err(ApiError::NotFound);
        }
        Ok(detail(imdb_id))
    }
}
