use thiserror::Error;

/// Message shown for any failure that is not an empty search.
pub const GENERIC_FAILURE: &str = "something went wrong";

/// Errors from a movie database client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered but reported no matching movie.
    #[error("movie not found")]
    NotFound,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// The short message a user sees in place of the result list.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => self.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}
