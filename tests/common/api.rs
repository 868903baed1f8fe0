//! Scripted in-memory transport.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use gradus_notification_center::{
    ApiError, NotificationApi, NotificationCategory, NotificationPage,
};

/// Transport double that replays scripted responses in call order.
///
/// Responses are queued with the `push_*` methods; a call with an empty
/// queue is a broken test and panics. An optional gate holds fetches until
/// the test releases them, for exercising in-flight behavior.
pub struct FakeApi {
    fetch_responses: Mutex<VecDeque<Result<NotificationPage, ApiError>>>,
    // Keyed by id: overlapping mark calls may reach the transport in any
    // order, so call-order scripting would be racy.
    read_responses: Mutex<HashMap<u64, VecDeque<Result<bool, ApiError>>>>,
    mark_all_responses: Mutex<VecDeque<Result<bool, ApiError>>>,
    fetch_gate: Option<Arc<Semaphore>>,
    fetch_calls: AtomicUsize,
    mark_all_calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            fetch_responses: Mutex::new(VecDeque::new()),
            read_responses: Mutex::new(HashMap::new()),
            mark_all_responses: Mutex::new(VecDeque::new()),
            fetch_gate: None,
            fetch_calls: AtomicUsize::new(0),
            mark_all_calls: AtomicUsize::new(0),
        }
    }

    /// Hold every fetch until the returned semaphore gets a permit.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut api = Self::new();
        api.fetch_gate = Some(gate.clone());
        (api, gate)
    }

    pub fn push_page(&self, page: NotificationPage) {
        self.fetch_responses.lock().unwrap().push_back(Ok(page));
    }

    pub fn push_fetch_error(&self) {
        self.fetch_responses
            .lock()
            .unwrap()
            .push_back(Err(transport_error("/api/notifications")));
    }

    pub fn push_read_response(&self, id: u64, response: Result<bool, ApiError>) {
        self.read_responses
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push_back(response);
    }

    pub fn push_mark_all_response(&self, response: Result<bool, ApiError>) {
        self.mark_all_responses.lock().unwrap().push_back(response);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn mark_all_calls(&self) -> usize {
        self.mark_all_calls.load(Ordering::SeqCst)
    }
}

/// Constructible stand-in for a transport failure.
pub fn transport_error(path: &str) -> ApiError {
    ApiError::UnexpectedStatus {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        url: format!("https://gradus.example.com{}", path),
    }
}

#[async_trait]
impl NotificationApi for FakeApi {
    async fn fetch_notifications(
        &self,
        _category: NotificationCategory,
        _page: u32,
    ) -> Result<NotificationPage, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.fetch_gate {
            gate.acquire().await.expect("fetch gate closed").forget();
        }
        self.fetch_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted fetch response left")
    }

    async fn set_read_status(&self, id: u64, _read: bool) -> Result<bool, ApiError> {
        self.read_responses
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(|responses| responses.pop_front())
            .unwrap_or_else(|| panic!("no scripted read-status response for id {}", id))
    }

    async fn mark_all_read(&self, _category: NotificationCategory) -> Result<bool, ApiError> {
        self.mark_all_calls.fetch_add(1, Ordering::SeqCst);
        self.mark_all_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted mark-all response left")
    }
}
