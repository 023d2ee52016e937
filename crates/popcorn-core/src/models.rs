use serde::{Deserialize, Serialize};

/// A movie the user rated and added to their watched list.
///
/// Field names on the wire match the stored JSON format exactly, so a list
/// written by one version is readable by the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    pub title: String,
    pub poster: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<f64>,
    /// Minutes. `None` when the source runtime was not numeric.
    pub runtime: Option<u32>,
    #[serde(rename = "userRating")]
    pub user_rating: u8,
    /// How many times the rating changed before it was committed.
    #[serde(rename = "countRatingDecisions", default)]
    pub count_rating_decisions: u32,
}
