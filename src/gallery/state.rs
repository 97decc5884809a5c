//! Search state owned by the gallery.

use serde::Serialize;

use crate::models::{ImageRecord, ResultPage};

/// Lifecycle phase derived from a [`SearchState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No query entered
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Loaded,
    /// The last fetch failed
    Failed,
}

/// Query, pagination cursor and accumulated results of a gallery.
///
/// Values handed out by [`Gallery::snapshot`](super::Gallery::snapshot) are
/// copies; writing to them does not affect the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub page: u32,
    pub results: Vec<ImageRecord>,
    pub total_pages: u32,
    pub loading: bool,
    pub error: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            results: Vec::new(),
            total_pages: 1,
            loading: false,
            error: false,
        }
    }
}

impl SearchState {
    /// Fresh idle state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        if self.query.is_empty() {
            Phase::Idle
        } else if self.loading {
            Phase::Loading
        } else if self.error {
            Phase::Failed
        } else {
            Phase::Loaded
        }
    }

    /// Whether another page may be requested
    pub fn can_load_more(&self) -> bool {
        !self.loading && !self.results.is_empty() && self.page < self.total_pages
    }

    /// Start over with a new query on page 1
    pub(crate) fn reset(&mut self, query: &str) {
        self.query = query.to_string();
        self.page = 1;
        self.results.clear();
    }

    /// Mark a fetch as started
    pub(crate) fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = false;
    }

    /// Merge a successful response for `page`.
    ///
    /// Page 1 replaces the accumulated results, later pages append.
    pub(crate) fn apply_page(&mut self, page: u32, response: ResultPage) {
        if page == 1 {
            self.results = response.images;
        } else {
            self.results.extend(response.images);
        }
        self.total_pages = response.total_pages.max(1);
    }

    /// Record a failed fetch; results and page count stay as they were
    pub(crate) fn fail_fetch(&mut self) {
        self.error = true;
    }

    /// Mark a fetch as settled, whatever its outcome
    pub(crate) fn end_fetch(&mut self) {
        self.loading = false;
    }
}
