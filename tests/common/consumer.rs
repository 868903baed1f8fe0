//! Recording consumer with async waiting.

use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::Notify;

use gradus_notification_center::{FeedConsumer, Notification};

/// Everything a feed can tell its consumer, in recorded order.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumerEvent {
    Loading,
    Items(Vec<Option<u64>>),
    ConnectionProblem,
    LoadingFooter,
    MarkAsRead(usize, u64),
    MarkRejected(usize, u64),
    MarkingAllStarted,
    MarkAllSucceeded,
    MarkAllConnectionProblem,
    ReenableMarkAllControl,
}

/// Consumer that records the event stream and lets tests await it.
#[derive(Default)]
pub struct RecordingConsumer {
    events: Mutex<Vec<ConsumerEvent>>,
    notify: Notify,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConsumerEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Block until the recorded stream satisfies `predicate`, or panic
    /// after five seconds.
    pub async fn wait_for(&self, predicate: impl Fn(&[ConsumerEvent]) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let notified = self.notify.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if predicate(&self.events()) {
                    return;
                }
                notified.await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "timed out waiting for consumer events; recorded so far: {:?}",
                self.events()
            )
        });
    }

    /// Wait until at least one event matches `predicate`.
    pub async fn wait_for_event(&self, predicate: impl Fn(&ConsumerEvent) -> bool) {
        self.wait_for(|events| events.iter().any(&predicate)).await;
    }

    fn push(&self, event: ConsumerEvent) {
        self.events.lock().unwrap().push(event);
        self.notify.notify_waiters();
    }
}

impl FeedConsumer for RecordingConsumer {
    fn on_loading(&self) {
        self.push(ConsumerEvent::Loading);
    }

    fn on_items_available(&self, items: &[Notification]) {
        self.push(ConsumerEvent::Items(items.iter().map(|n| n.id).collect()));
    }

    fn on_connection_problem(&self) {
        self.push(ConsumerEvent::ConnectionProblem);
    }

    fn on_loading_footer(&self) {
        self.push(ConsumerEvent::LoadingFooter);
    }

    fn on_mark_as_read(&self, position: usize, id: u64) {
        self.push(ConsumerEvent::MarkAsRead(position, id));
    }

    fn on_mark_rejected(&self, position: usize, id: u64) {
        self.push(ConsumerEvent::MarkRejected(position, id));
    }

    fn on_marking_all_started(&self) {
        self.push(ConsumerEvent::MarkingAllStarted);
    }

    fn on_mark_all_succeeded(&self) {
        self.push(ConsumerEvent::MarkAllSucceeded);
    }

    fn on_mark_all_connection_problem(&self) {
        self.push(ConsumerEvent::MarkAllConnectionProblem);
    }

    fn on_reenable_mark_all_control(&self) {
        self.push(ConsumerEvent::ReenableMarkAllControl);
    }
}
