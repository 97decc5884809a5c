//! Unsplash photo search source implementation.
//!
//! Uses the Unsplash search endpoint `GET /search/photos`.
//! API documentation: <https://unsplash.com/documentation#search-photos>

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::config::UnsplashConfig;
use crate::models::{ImageRecord, PhotoQuery, ResultPage};
use crate::sources::{ImageSource, SourceError};
use crate::utils::HttpClient;

/// Default base URL for the Unsplash API
pub const UNSPLASH_API_BASE: &str = "https://api.unsplash.com";

/// Unsplash photo search source
///
/// Authenticates every request with the configured access key passed as the
/// `client_id` query parameter.
#[derive(Debug, Clone)]
pub struct UnsplashSource {
    client: Arc<HttpClient>,
    base_url: String,
    access_key: String,
}

impl UnsplashSource {
    /// Create a source from configuration
    ///
    /// Fails when no access key is configured, the timeout is zero, or the
    /// base URL is not a valid absolute URL.
    pub fn new(config: &UnsplashConfig) -> Result<Self, SourceError> {
        let access_key = config
            .access_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SourceError::MissingCredential("Unsplash".to_string()))?;

        if config.timeout_secs == 0 {
            return Err(SourceError::InvalidRequest(
                "Request timeout must be at least 1 second".to_string(),
            ));
        }

        let client = HttpClient::with_timeout(Duration::from_secs(config.timeout_secs))?;

        Self::with_client(Arc::new(client), &config.base_url, access_key)
    }

    /// Create with a custom HTTP client and endpoint (for testing)
    pub fn with_client(
        client: Arc<HttpClient>,
        base_url: &str,
        access_key: &str,
    ) -> Result<Self, SourceError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| SourceError::InvalidRequest(format!("Invalid base URL {base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(SourceError::InvalidRequest(format!(
                "Base URL cannot be used as a base: {base_url}"
            )));
        }

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search/photos", self.base_url)
    }
}

#[async_trait]
impl ImageSource for UnsplashSource {
    fn id(&self) -> &str {
        "unsplash"
    }

    fn name(&self) -> &str {
        "Unsplash"
    }

    async fn search_photos(&self, query: &PhotoQuery) -> Result<ResultPage, SourceError> {
        if query.query.is_empty() {
            return Err(SourceError::InvalidRequest("Empty search query".to_string()));
        }
        if query.page == 0 {
            return Err(SourceError::InvalidRequest(
                "Page numbers start at 1".to_string(),
            ));
        }

        let page = query.page.to_string();
        let per_page = query.per_page.to_string();

        tracing::debug!(
            query = %query.query,
            page = query.page,
            per_page = query.per_page,
            "Requesting Unsplash search page"
        );

        let response = self
            .client
            .get(&self.search_url())
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query.query.as_str()),
                ("page", page.as_str()),
                ("per_page", per_page.as_str()),
                ("client_id", self.access_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let body = response.text().await?;

        let data: UnsplashSearchResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::Parse(format!("Failed to parse Unsplash response: {}", e)))?;

        Ok(data.into_page())
    }
}

/// Pull the human-readable message out of an Unsplash error body
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<UnsplashErrorBody>(body)
        .ok()
        .filter(|parsed| !parsed.errors.is_empty())
        .map(|parsed| parsed.errors.join("; "))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Unsplash search response
#[derive(Debug, Deserialize)]
struct UnsplashSearchResponse {
    #[serde(default)]
    total: u64,
    total_pages: u32,
    results: Vec<UnsplashPhoto>,
}

impl UnsplashSearchResponse {
    fn into_page(self) -> ResultPage {
        let images = self.results.into_iter().map(ImageRecord::from).collect();
        ResultPage::new(images, self.total_pages).total(self.total)
    }
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    id: String,
    urls: UnsplashUrls,
    alt_description: Option<String>,
    downloads: Option<u64>,
    views: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    small: String,
    regular: String,
}

impl From<UnsplashPhoto> for ImageRecord {
    fn from(photo: UnsplashPhoto) -> Self {
        ImageRecord {
            id: photo.id,
            thumbnail_url: photo.urls.small,
            full_url: photo.urls.regular,
            alt_text: photo.alt_description,
            download_count: photo.downloads.unwrap_or(0),
            view_count: photo.views.unwrap_or(0),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UnsplashErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}
