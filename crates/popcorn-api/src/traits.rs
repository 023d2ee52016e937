//! Service trait and the shared movie types it returns.
//!
//! The runtime only talks to [`MovieService`], so tests can swap the OMDb
//! client for an in-process fake.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A movie database that can be searched by title and queried by id.
pub trait MovieService: Send + Sync {
    /// Search movies by title text.
    fn search_movies(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<MovieSummary>, ApiError>> + Send;

    /// Fetch full details for a single movie.
    fn get_movie(
        &self,
        imdb_id: &str,
    ) -> impl Future<Output = Result<MovieDetail, ApiError>> + Send;
}

/// One row of a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster: String,
}

/// Full details for a selected movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub imdb_id: String,
    pub title: String,
    pub poster: String,
    /// Runtime as reported, e.g. "142 min".
    pub runtime: String,
    /// `None` when the API reports "N/A".
    pub imdb_rating: Option<f64>,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}

impl MovieDetail {
    /// Leading number of the runtime text, in minutes.
    pub fn runtime_minutes(&self) -> Option<u32> {
        self.runtime.split_whitespace().next()?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(runtime: &str) -> MovieDetail {
        MovieDetail {
            imdb_id: "tt0372784".into(),
            title: "Batman Begins".into(),
            poster: "N/A".into(),
            runtime: runtime.into(),
            imdb_rating: Some(8.2),
            plot: String::new(),
            released: String::new(),
            actors: String::new(),
            director: String::new(),
            genre: String::new(),
        }
    }

    #[test]
    fn test_runtime_minutes() {
        assert_eq!(detail("140 min").runtime_minutes(), Some(140));
        assert_eq!(detail("N/A").runtime_minutes(), None);
        assert_eq!(detail("").runtime_minutes(), None);
    }
}
