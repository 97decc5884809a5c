//! Image record model representing one photo returned by a search.

use serde::{Deserialize, Serialize};

/// A single photo from a search result page.
///
/// Records are immutable once received. The gallery owns them; the detail
/// overlay only ever holds a [`SelectedImage`] projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Provider-assigned photo identifier
    pub id: String,

    /// Small rendition used for the result grid
    pub thumbnail_url: String,

    /// Regular rendition shown in the detail overlay
    pub full_url: String,

    /// Alternative text, when the provider has one
    pub alt_text: Option<String>,

    /// Total downloads (0 when the provider omits it)
    pub download_count: u64,

    /// Total views (0 when the provider omits it)
    pub view_count: u64,
}

impl ImageRecord {
    /// Create a record with no alt text and zero counters
    pub fn new(
        id: impl Into<String>,
        thumbnail_url: impl Into<String>,
        full_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            thumbnail_url: thumbnail_url.into(),
            full_url: full_url.into(),
            alt_text: None,
            download_count: 0,
            view_count: 0,
        }
    }

    /// Set the alt text
    pub fn alt_text(mut self, alt: impl Into<String>) -> Self {
        self.alt_text = Some(alt.into());
        self
    }

    /// Set download and view counters
    pub fn counts(mut self, downloads: u64, views: u64) -> Self {
        self.download_count = downloads;
        self.view_count = views;
        self
    }

    /// Alt text or a placeholder for display
    pub fn description(&self) -> &str {
        self.alt_text.as_deref().unwrap_or("(no description)")
    }
}

/// The part of an [`ImageRecord`] the detail overlay displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedImage {
    pub id: String,
    pub full_url: String,
    pub alt_text: Option<String>,
    pub download_count: u64,
    pub view_count: u64,
}

impl From<&ImageRecord> for SelectedImage {
    fn from(record: &ImageRecord) -> Self {
        Self {
            id: record.id.clone(),
            full_url: record.full_url.clone(),
            alt_text: record.alt_text.clone(),
            download_count: record.download_count,
            view_count: record.view_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = ImageRecord::new("abc", "https://img/small", "https://img/regular")
            .alt_text("a cat on a sofa")
            .counts(10, 250);

        assert_eq!(record.id, "abc");
        assert_eq!(record.description(), "a cat on a sofa");
        assert_eq!(record.download_count, 10);
        assert_eq!(record.view_count, 250);
    }

    #[test]
    fn test_description_placeholder() {
        let record = ImageRecord::new("abc", "s", "r");
        assert_eq!(record.description(), "(no description)");
    }

    #[test]
    fn test_selected_projection() {
        let record = ImageRecord::new("xyz", "s", "r").alt_text("dog").counts(1, 2);
        let selected = SelectedImage::from(&record);

        assert_eq!(selected.id, "xyz");
        assert_eq!(selected.full_url, "r");
        assert_eq!(selected.alt_text.as_deref(), Some("dog"));
        assert_eq!(selected.download_count, 1);
        assert_eq!(selected.view_count, 2);
    }
}
