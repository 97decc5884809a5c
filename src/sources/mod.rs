//! Remote image sources.
//!
//! This module defines the [`ImageSource`] trait the gallery fetches pages
//! through. [`UnsplashSource`] talks to the Unsplash photo search API;
//! [`MockSource`] returns scripted pages for tests and offline demos.
//!
//! # Implementing a New Source
//!
//! 1. Create a struct that implements `ImageSource`
//! 2. Map the provider's response onto [`ResultPage`] and [`ImageRecord`]
//! 3. Collapse every provider failure into a [`SourceError`]
//!
//! [`ImageRecord`]: crate::models::ImageRecord

pub mod mock;
mod unsplash;

pub use mock::MockSource;
pub use unsplash::{UnsplashSource, UNSPLASH_API_BASE};

use crate::models::{PhotoQuery, ResultPage};
use async_trait::async_trait;

/// A paged full-text photo search backend.
#[async_trait]
pub trait ImageSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "unsplash")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Fetch one page of photos matching the query
    async fn search_photos(&self, query: &PhotoQuery) -> Result<ResultPage, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No access key was configured for a source that needs one
    #[error("Missing access key for {0}")]
    MissingCredential(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::Parse(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::Api {
            status: 401,
            message: "OAuth error: The access token is invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (401): OAuth error: The access token is invalid"
        );

        let err: SourceError = serde_json::from_str::<ResultPage>("{").unwrap_err().into();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
