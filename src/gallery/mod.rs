//! Incremental search and pagination state machine.
//!
//! A [`Gallery`] owns one [`SearchState`] and reacts to two events:
//!
//! - [`Gallery::search`] resets the query to page 1, discards accumulated
//!   results and fetches the first page.
//! - [`Gallery::load_more`] advances to the next page and appends it, but only
//!   while no fetch is in flight, results exist and pages remain.
//!
//! Each fetch runs as a spawned tokio task and writes its outcome back into
//! the shared state. The returned [`FetchHandle`] can be awaited to observe
//! completion; dropping it does not cancel the fetch.
//!
//! A superseded fetch is never cancelled. If an older query's page-1 response
//! arrives after a newer one, it replaces the newer results. The only
//! response ever dropped is one that lands after the query was cleared, so
//! an idle gallery always has no results.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use unsplash_gallery::gallery::Gallery;
//! use unsplash_gallery::sources::MockSource;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let gallery = Gallery::new(Arc::new(MockSource::new()));
//! if let Some(fetch) = gallery.search("mountains") {
//!     fetch.wait().await;
//! }
//! while let Some(fetch) = gallery.load_more() {
//!     fetch.wait().await;
//! }
//! println!("{} photos", gallery.results().len());
//! # }
//! ```

mod state;

pub use state::{Phase, SearchState};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;

use crate::models::{ImageRecord, PhotoQuery, DEFAULT_PER_PAGE};
use crate::sources::ImageSource;

/// Search state machine over one [`ImageSource`].
///
/// Must be driven from within a tokio runtime, since every fetch is spawned.
#[derive(Debug, Clone)]
pub struct Gallery {
    source: Arc<dyn ImageSource>,
    state: Arc<Mutex<SearchState>>,
}

impl Gallery {
    /// Create an idle gallery fetching from `source`
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(SearchState::new())),
        }
    }

    /// Start a new search.
    ///
    /// Always resets to page 1 with no results. Returns `None` without
    /// fetching when `query` is empty.
    pub fn search(&self, query: &str) -> Option<FetchHandle> {
        let request = {
            let mut state = self.lock();
            state.reset(query);
            if query.is_empty() {
                tracing::debug!("Empty query, staying idle");
                return None;
            }
            state.begin_fetch();
            PhotoQuery::new(query).per_page(DEFAULT_PER_PAGE)
        };

        tracing::info!(query = %request.query, "Starting new search");
        Some(self.spawn_fetch(request))
    }

    /// Request the next page.
    ///
    /// A no-op returning `None` while loading, with no results, or on the
    /// last page. Calls made while a fetch is in flight are dropped, not
    /// queued.
    pub fn load_more(&self) -> Option<FetchHandle> {
        let request = {
            let mut state = self.lock();
            if !state.can_load_more() {
                tracing::debug!(
                    page = state.page,
                    total_pages = state.total_pages,
                    loading = state.loading,
                    "Ignoring load more"
                );
                return None;
            }
            state.page += 1;
            state.begin_fetch();
            PhotoQuery::new(state.query.clone())
                .page(state.page)
                .per_page(DEFAULT_PER_PAGE)
        };

        tracing::info!(query = %request.query, page = request.page, "Loading more results");
        Some(self.spawn_fetch(request))
    }

    fn spawn_fetch(&self, request: PhotoQuery) -> FetchHandle {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let query = request.query.clone();
        let page = request.page;

        let task = tokio::spawn(async move { run_fetch(source, state, request).await });

        FetchHandle { query, page, task }
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        lock_state(&self.state)
    }

    /// Copy of the whole state
    pub fn snapshot(&self) -> SearchState {
        self.lock().clone()
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    /// Whether [`load_more`](Self::load_more) would fetch
    pub fn can_load_more(&self) -> bool {
        self.lock().can_load_more()
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn page(&self) -> u32 {
        self.lock().page
    }

    pub fn total_pages(&self) -> u32 {
        self.lock().total_pages
    }

    pub fn results(&self) -> Vec<ImageRecord> {
        self.lock().results.clone()
    }

    /// Record at `index` in the accumulated results
    pub fn result(&self, index: usize) -> Option<ImageRecord> {
        self.lock().results.get(index).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn has_error(&self) -> bool {
        self.lock().error
    }

    /// Name of the backing source
    pub fn source_name(&self) -> &str {
        self.source.name()
    }
}

fn lock_state(state: &Mutex<SearchState>) -> MutexGuard<'_, SearchState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The fetch effect: call the source, merge by page, settle the flags.
async fn run_fetch(
    source: Arc<dyn ImageSource>,
    state: Arc<Mutex<SearchState>>,
    request: PhotoQuery,
) -> Phase {
    let outcome = source.search_photos(&request).await;

    let mut state = lock_state(&state);
    match outcome {
        Ok(_) if state.query.is_empty() => {
            tracing::debug!(
                query = %request.query,
                page = request.page,
                "Discarding page that arrived after the query was cleared"
            );
        }
        Ok(response) => {
            tracing::debug!(
                query = %request.query,
                page = request.page,
                received = response.images.len(),
                total_pages = response.total_pages,
                "Fetched page"
            );
            state.apply_page(request.page, response);
        }
        Err(e) => {
            tracing::warn!(
                query = %request.query,
                page = request.page,
                source = source.id(),
                "Failed to load images: {}",
                e
            );
            state.fail_fetch();
        }
    }
    state.end_fetch();
    state.phase()
}

/// Awaitable handle on one spawned fetch
#[derive(Debug)]
pub struct FetchHandle {
    query: String,
    page: u32,
    task: JoinHandle<Phase>,
}

impl FetchHandle {
    /// Query this fetch was issued for
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Page this fetch was issued for
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Wait for the fetch to settle and return the resulting phase.
    ///
    /// A fetch task that panicked reports [`Phase::Failed`].
    pub async fn wait(self) -> Phase {
        match self.task.await {
            Ok(phase) => phase,
            Err(e) => {
                tracing::error!("Fetch task for {:?} page {} aborted: {}", self.query, self.page, e);
                Phase::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::{make_page, MockSource};
    use crate::sources::SourceError;

    fn gallery_with(source: &Arc<MockSource>) -> Gallery {
        Gallery::new(Arc::clone(source) as Arc<dyn ImageSource>)
    }

    fn ids(gallery: &Gallery) -> Vec<String> {
        gallery.results().into_iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn test_search_loads_first_page() {
        let source = Arc::new(MockSource::new());
        source.respond("cats", 1, make_page(&["1"], 3));
        let gallery = gallery_with(&source);

        let phase = gallery.search("cats").unwrap().wait().await;

        assert_eq!(phase, Phase::Loaded);
        assert_eq!(
            gallery.snapshot(),
            SearchState {
                query: "cats".to_string(),
                page: 1,
                results: make_page(&["1"], 3).images,
                total_pages: 3,
                loading: false,
                error: false,
            }
        );

        let calls = source.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], PhotoQuery::new("cats").page(1).per_page(12));
    }

    #[tokio::test]
    async fn test_search_resets_before_fetch_resolves() {
        let source = Arc::new(MockSource::new());
        source.respond("cats", 1, make_page(&["1"], 3));
        source.respond("cats", 2, make_page(&["2"], 3));
        let gallery = gallery_with(&source);

        gallery.search("cats").unwrap().wait().await;
        gallery.load_more().unwrap().wait().await;
        assert_eq!(gallery.page(), 2);

        let gate = source.respond_gated("dogs", 1, make_page(&["d1"], 1));
        let fetch = gallery.search("dogs").unwrap();

        let state = gallery.snapshot();
        assert_eq!(state.query, "dogs");
        assert_eq!(state.page, 1);
        assert!(state.results.is_empty());
        assert!(state.loading);
        assert_eq!(gallery.phase(), Phase::Loading);

        gate.send(()).unwrap();
        fetch.wait().await;
        assert_eq!(ids(&gallery), ["d1"]);
        assert!(!gallery.is_loading());
    }

    #[tokio::test]
    async fn test_load_more_appends() {
        let source = Arc::new(MockSource::new());
        source.respond("cats", 1, make_page(&["1"], 3));
        source.respond("cats", 2, make_page(&["2"], 3));
        let gallery = gallery_with(&source);

        gallery.search("cats").unwrap().wait().await;
        let fetch = gallery.load_more().unwrap();
        assert_eq!(fetch.page(), 2);
        assert_eq!(fetch.query(), "cats");
        fetch.wait().await;

        assert_eq!(gallery.page(), 2);
        assert_eq!(gallery.total_pages(), 3);
        assert_eq!(ids(&gallery), ["1", "2"]);
        assert_eq!(source.calls()[1].page, 2);
    }

    #[tokio::test]
    async fn test_load_more_on_last_page_is_noop() {
        let source = Arc::new(MockSource::new());
        source.respond("cats", 1, make_page(&["1"], 1));
        let gallery = gallery_with(&source);

        gallery.search("cats").unwrap().wait().await;
        let before = gallery.snapshot();

        assert!(gallery.load_more().is_none());
        assert_eq!(gallery.snapshot(), before);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_load_more_while_loading_is_noop() {
        let source = Arc::new(MockSource::new());
        source.respond("cats", 1, make_page(&["1"], 3));
        let gate = source.respond_gated("cats", 2, make_page(&["2"], 3));
        let gallery = gallery_with(&source);

        gallery.search("cats").unwrap().wait().await;
        let fetch = gallery.load_more().unwrap();
        assert!(gallery.is_loading());

        assert!(gallery.load_more().is_none());
        assert_eq!(gallery.page(), 2);

        gate.send(()).unwrap();
        fetch.wait().await;
        assert_eq!(source.call_count(), 2);
        assert!(gallery.can_load_more());
    }

    #[tokio::test]
    async fn test_load_more_without_results_is_noop() {
        let source = Arc::new(MockSource::new());
        source.respond("nothing", 1, make_page(&[], 5));
        let gallery = gallery_with(&source);

        assert!(gallery.load_more().is_none());

        gallery.search("nothing").unwrap().wait().await;
        assert!(gallery.load_more().is_none());
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_search_stays_idle() {
        let source = Arc::new(MockSource::new());
        let gallery = gallery_with(&source);

        assert!(gallery.search("").is_none());
        assert_eq!(gallery.phase(), Phase::Idle);
        assert!(gallery.results().is_empty());
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_search_clears_previous_results() {
        let source = Arc::new(MockSource::new());
        source.respond("cats", 1, make_page(&["1"], 3));
        let gallery = gallery_with(&source);

        gallery.search("cats").unwrap().wait().await;
        assert!(gallery.search("").is_none());

        assert_eq!(gallery.phase(), Phase::Idle);
        assert!(gallery.results().is_empty());
        assert_eq!(gallery.page(), 1);
    }

    #[tokio::test]
    async fn test_late_page_after_clear_is_discarded() {
        let source = Arc::new(MockSource::new());
        let gate = source.respond_gated("cats", 1, make_page(&["1"], 3));
        let gallery = gallery_with(&source);

        let fetch = gallery.search("cats").unwrap();
        assert!(gallery.search("").is_none());

        gate.send(()).unwrap();
        fetch.wait().await;

        assert_eq!(gallery.phase(), Phase::Idle);
        assert!(gallery.results().is_empty());
        assert!(!gallery.is_loading());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_results() {
        let source = Arc::new(MockSource::new());
        source.respond("cats", 1, make_page(&["1"], 3));
        source.fail("cats", 2, SourceError::Network("connection reset".to_string()));
        let gallery = gallery_with(&source);

        gallery.search("cats").unwrap().wait().await;
        let phase = gallery.load_more().unwrap().wait().await;

        assert_eq!(phase, Phase::Failed);
        assert!(gallery.has_error());
        assert!(!gallery.is_loading());
        assert_eq!(ids(&gallery), ["1"]);
        assert_eq!(gallery.total_pages(), 3);
    }

    #[tokio::test]
    async fn test_new_search_clears_error() {
        let source = Arc::new(MockSource::new());
        source.fail(
            "cats",
            1,
            SourceError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        );
        source.respond("cats", 1, make_page(&["1"], 1));
        let gallery = gallery_with(&source);

        assert_eq!(gallery.search("cats").unwrap().wait().await, Phase::Failed);
        assert!(gallery.results().is_empty());

        assert_eq!(gallery.search("cats").unwrap().wait().await, Phase::Loaded);
        assert!(!gallery.has_error());
        assert_eq!(ids(&gallery), ["1"]);
    }

    #[tokio::test]
    async fn test_dropped_handle_still_fetches() {
        let source = Arc::new(MockSource::new());
        source.respond("cats", 1, make_page(&["1"], 1));
        let gallery = gallery_with(&source);

        drop(gallery.search("cats"));
        while gallery.is_loading() {
            tokio::task::yield_now().await;
        }

        assert_eq!(ids(&gallery), ["1"]);
    }
}
