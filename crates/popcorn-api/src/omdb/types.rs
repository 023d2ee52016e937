use serde::Deserialize;

use crate::traits::{MovieDetail, MovieSummary};

// ── Search responses ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OmdbSearchResponse {
    /// "True" or "False".
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchItem>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OmdbSearchItem {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

// ── Movie detail responses ──────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OmdbMovie {
    #[serde(rename = "Response")]
    pub response: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Poster")]
    pub poster: String,
    #[serde(rename = "Runtime")]
    pub runtime: String,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    #[serde(rename = "Plot")]
    pub plot: String,
    #[serde(rename = "Released")]
    pub released: String,
    #[serde(rename = "Actors")]
    pub actors: String,
    #[serde(rename = "Director")]
    pub director: String,
    #[serde(rename = "Genre")]
    pub genre: String,
}

/// OMDb encodes booleans as the strings "True" / "False".
fn is_true(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("true")
}

// ── Conversions to shared trait types ───────────────────────────

impl OmdbSearchResponse {
    pub fn is_success(&self) -> bool {
        is_true(&self.response)
    }
}

impl OmdbSearchItem {
    pub fn into_summary(self) -> MovieSummary {
        MovieSummary {
            imdb_id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster: self.poster,
        }
    }
}

impl OmdbMovie {
    /// Detail responses omit `Response` on some mirrors; treat absence as success.
    pub fn is_success(&self) -> bool {
        self.response.as_deref().map_or(true, is_true)
    }

    /// Convert to the shared detail type. `requested_id` fills in the id
    /// when the payload does not echo it back.
    pub fn into_detail(self, requested_id: &str) -> MovieDetail {
        let imdb_id = if self.imdb_id.is_empty() {
            requested_id.to_string()
        } else {
            self.imdb_id
        };
        MovieDetail {
            imdb_id,
            title: self.title,
            poster: self.poster,
            runtime: self.runtime,
            imdb_rating: self.imdb_rating.trim().parse().ok(),
            plot: self.plot,
            released: self.released,
            actors: self.actors,
            director: self.director,
            genre: self.genre,
        }
    }
}
