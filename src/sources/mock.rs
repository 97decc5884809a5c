//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::models::{ImageRecord, PhotoQuery, ResultPage};
use crate::sources::{ImageSource, SourceError};

/// A scripted reply, optionally held back until its gate is released.
#[derive(Debug)]
struct MockReply {
    result: Result<ResultPage, SourceError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// A mock source for testing that returns predefined responses.
///
/// Replies scripted for a `(query, page)` pair are consumed in order. Calls
/// with no scripted reply fall back to the default response, or to an empty
/// single-page result.
#[derive(Debug, Default)]
pub struct MockSource {
    default_response: Mutex<Option<ResultPage>>,
    scripted: Mutex<HashMap<(String, u32), VecDeque<MockReply>>>,
    calls: Mutex<Vec<PhotoQuery>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned when nothing is scripted for a call.
    pub fn set_search_response(&self, response: ResultPage) {
        let mut guard = self.default_response.lock().unwrap();
        *guard = Some(response);
    }

    /// Script a successful reply for one `(query, page)` call.
    pub fn respond(&self, query: &str, page: u32, response: ResultPage) {
        self.push(query, page, Ok(response), None);
    }

    /// Script a failed reply for one `(query, page)` call.
    pub fn fail(&self, query: &str, page: u32, error: SourceError) {
        self.push(query, page, Err(error), None);
    }

    /// Script a reply that is only delivered once the returned sender fires
    /// (or is dropped).
    pub fn respond_gated(
        &self,
        query: &str,
        page: u32,
        response: ResultPage,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(query, page, Ok(response), Some(rx));
        tx
    }

    fn push(
        &self,
        query: &str,
        page: u32,
        result: Result<ResultPage, SourceError>,
        gate: Option<oneshot::Receiver<()>>,
    ) {
        let mut guard = self.scripted.lock().unwrap();
        guard
            .entry((query.to_string(), page))
            .or_default()
            .push_back(MockReply { result, gate });
    }

    /// Every query received so far, in call order.
    pub fn calls(&self) -> Vec<PhotoQuery> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search_photos(&self, query: &PhotoQuery) -> Result<ResultPage, SourceError> {
        self.calls.lock().unwrap().push(query.clone());

        let reply = {
            let mut guard = self.scripted.lock().unwrap();
            guard
                .get_mut(&(query.query.clone(), query.page))
                .and_then(VecDeque::pop_front)
        };

        match reply {
            Some(MockReply { result, gate }) => {
                if let Some(gate) = gate {
                    // A dropped sender releases the reply as well.
                    let _ = gate.await;
                }
                result
            }
            None => {
                let guard = self.default_response.lock().unwrap();
                Ok(guard.clone().unwrap_or_else(|| ResultPage::new(Vec::new(), 1)))
            }
        }
    }
}

/// Helper function to create a mock image record for testing.
pub fn make_image(id: &str) -> ImageRecord {
    ImageRecord::new(
        id,
        format!("http://example.com/{}/small.jpg", id),
        format!("http://example.com/{}/regular.jpg", id),
    )
    .alt_text(format!("photo {}", id))
}

/// Helper function to create a result page of mock records.
pub fn make_page(ids: &[&str], total_pages: u32) -> ResultPage {
    ResultPage::new(ids.iter().map(|id| make_image(id)).collect(), total_pages)
}
