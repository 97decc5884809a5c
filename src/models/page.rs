//! Search request and response models.

use serde::{Deserialize, Serialize};

use super::ImageRecord;

/// Number of photos requested per page
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Arguments of one remote search call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoQuery {
    /// Full-text search terms
    pub query: String,

    /// 1-based page index
    pub page: u32,

    /// Page size
    pub per_page: u32,
}

impl PhotoQuery {
    /// Create a query for the first page
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Set the page
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }
}

/// One decoded page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Records on this page, in provider order
    pub images: Vec<ImageRecord>,

    /// Number of pages the provider reports for the query
    pub total_pages: u32,

    /// Total number of matching photos
    pub total: u64,
}

impl ResultPage {
    /// Create a result page
    pub fn new(images: Vec<ImageRecord>, total_pages: u32) -> Self {
        let total = images.len() as u64;
        Self {
            images,
            total_pages,
            total,
        }
    }

    /// Set the total match count
    pub fn total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = PhotoQuery::new("mountains");
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 12);

        let query = query.page(3).per_page(30);
        assert_eq!(query.page, 3);
        assert_eq!(query.per_page, 30);
    }

    #[test]
    fn test_result_page_total() {
        let page = ResultPage::new(vec![ImageRecord::new("1", "s", "r")], 4);
        assert_eq!(page.total, 1);
        assert_eq!(page.total(48).total, 48);
    }
}
