use std::time::Duration;

use reqwest::Client;
use url::Url;

use super::types::{OmdbMovie, OmdbSearchItem, OmdbSearchResponse};
use crate::error::ApiError;
use crate::traits::{MovieDetail, MovieService, MovieSummary};

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// OMDb (Open Movie Database) client.
///
/// Both endpoints live at the API root and are told apart by query
/// parameters: `s=` searches, `i=` fetches a single title.
pub struct OmdbClient {
    api_key: String,
    base_url: Url,
    http: Client,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default OMDb URL is valid"),
            http: Client::new(),
        }
    }

    /// Point the client at a different API root (mirrors, local fakes).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiError> {
        self.base_url = Url::parse(base_url)?;
        Ok(self)
    }

    /// Rebuild the HTTP client with a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ApiError> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check the HTTP response for errors and return the body text on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "OMDb API error");
            Err(ApiError::Api {
                status,
                message: body,
            })
        }
    }
}

impl MovieService for OmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, ApiError> {
        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&[("s", query), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let search: OmdbSearchResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if !search.is_success() {
            tracing::debug!(
                query,
                reason = search.error.as_deref().unwrap_or_default(),
                "OMDb search returned no results"
            );
            return Err(ApiError::NotFound);
        }

        Ok(search
            .search
            .into_iter()
            .map(OmdbSearchItem::into_summary)
            .collect())
    }

    async fn get_movie(&self, imdb_id: &str) -> Result<MovieDetail, ApiError> {
        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&[("apikey", self.api_key.as_str()), ("i", imdb_id)])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let movie: OmdbMovie = resp
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        if !movie.is_success() {
            tracing::debug!(
                imdb_id,
                reason = movie.error.as_deref().unwrap_or_default(),
                "OMDb lookup failed"
            );
            return Err(ApiError::NotFound);
        }

        Ok(movie.into_detail(imdb_id))
    }
}
