//! Public feed handle and the message set of the dispatch channel.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, NotificationApi};
use crate::config::FeedConfig;
use crate::connectivity::{ConnectivityHub, ConnectivityListener};
use crate::notifications::{Notification, NotificationCategory, PageMeta};

use super::consumer::{CategoryReadObserver, FeedConsumer};
use super::dispatcher::FeedDispatcher;
use super::state::FeedSnapshot;

/// Everything that travels over a feed's serialized dispatch channel:
/// public commands and background-task completions alike. FIFO channel
/// order is what makes delivery order deterministic.
pub(crate) enum FeedMessage {
    InitialLoad {
        category: NotificationCategory,
        reply: Option<oneshot::Sender<bool>>,
    },
    LoadMore,
    PageFetched {
        items: Vec<Notification>,
        meta: PageMeta,
        initial: bool,
    },
    PageFailed {
        initial: bool,
    },
    MarkAsRead {
        id: u64,
    },
    MarkOutcome {
        id: u64,
        outcome: Result<bool, ApiError>,
    },
    MarkAllAsRead,
    MarkAllOutcome {
        outcome: Result<bool, ApiError>,
    },
    PropagateCategoryRead {
        category: NotificationCategory,
    },
    NotificationShouldBeRead {
        id: u64,
    },
    Attach {
        consumer: Arc<dyn FeedConsumer>,
    },
    Detach,
    ConnectivityRestored,
    Snapshot {
        reply: oneshot::Sender<FeedSnapshot>,
    },
}

/// Cloneable handle to one per-category feed.
///
/// All methods are non-blocking sends onto the feed's dispatch channel; the
/// dispatcher task owns the state and applies messages one at a time.
/// Dropping every handle (or calling [`shutdown`](Self::shutdown)) stops the
/// dispatcher; in-flight transport work is never cancelled, its results are
/// simply discarded once the dispatcher is gone.
#[derive(Clone)]
pub struct NotificationFeed {
    tx: mpsc::UnboundedSender<FeedMessage>,
    shutdown: CancellationToken,
}

impl NotificationFeed {
    /// Spawn a feed's dispatcher onto the current tokio runtime.
    ///
    /// `connectivity` is the hub the feed subscribes to while a consumer is
    /// attached; `read_observer` receives confirmed bulk-mark categories for
    /// sibling propagation. Both are optional collaborators.
    pub fn spawn(
        api: Arc<dyn NotificationApi>,
        config: FeedConfig,
        connectivity: Option<Arc<ConnectivityHub>>,
        read_observer: Option<Arc<dyn CategoryReadObserver>>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let dispatcher = FeedDispatcher::new(
            api,
            config,
            connectivity,
            read_observer,
            rx,
            tx.downgrade(),
        );
        tokio::spawn(dispatcher.run(shutdown.clone()));

        Self { tx, shutdown }
    }

    /// Start the initial load for `category`.
    ///
    /// Returns `false` when the call was accepted and a fetch is on its way,
    /// `true` when it was ignored — a load is already in flight, content was
    /// already shown, or the feed is shut down. Either way nothing further
    /// is expected from the caller.
    pub async fn initial_load(&self, category: NotificationCategory) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        let sent = self.tx.send(FeedMessage::InitialLoad {
            category,
            reply: Some(reply_tx),
        });
        if sent.is_err() {
            return true;
        }
        reply_rx.await.unwrap_or(true)
    }

    /// Fetch the next page. No-op while a fetch is in flight or after the
    /// last page was reached.
    pub fn load_more(&self) {
        let _ = self.tx.send(FeedMessage::LoadMore);
    }

    /// Ask the backend to mark one notification read.
    pub fn mark_as_read(&self, id: u64) {
        let _ = self.tx.send(FeedMessage::MarkAsRead { id });
    }

    /// Ask the backend to mark the whole bound category read.
    pub fn mark_all_as_read(&self) {
        let _ = self.tx.send(FeedMessage::MarkAllAsRead);
    }

    /// Apply a sibling feed's confirmed bulk read to this feed's cache.
    pub fn propagate_category_read(&self, category: NotificationCategory) {
        let _ = self.tx.send(FeedMessage::PropagateCategoryRead { category });
    }

    /// Refresh the read indicator of an id known to have been read through
    /// another path.
    pub fn notification_should_be_read(&self, id: u64) {
        let _ = self.tx.send(FeedMessage::NotificationShouldBeRead { id });
    }

    /// Bind the event sink and subscribe to connectivity restoration.
    pub fn attach(&self, consumer: Arc<dyn FeedConsumer>) {
        let _ = self.tx.send(FeedMessage::Attach { consumer });
    }

    /// Unbind the event sink. In-flight work keeps running; its state
    /// changes still commit, only the events go nowhere.
    pub fn detach(&self) {
        let _ = self.tx.send(FeedMessage::Detach);
    }

    /// Current cache and flags; `None` once the feed is shut down.
    pub async fn snapshot(&self) -> Option<FeedSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(FeedMessage::Snapshot { reply: reply_tx })
            .ok()?;
        reply_rx.await.ok()
    }

    /// Stop the dispatcher. Idempotent.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Connectivity subscriber registered on behalf of a feed while a consumer
/// is attached. Holds only a weak sender so a dead feed cannot be kept
/// alive by the hub.
pub(crate) struct FeedConnectivityListener {
    tx: mpsc::WeakUnboundedSender<FeedMessage>,
}

impl FeedConnectivityListener {
    pub(crate) fn new(tx: mpsc::WeakUnboundedSender<FeedMessage>) -> Self {
        Self { tx }
    }
}

impl ConnectivityListener for FeedConnectivityListener {
    fn on_connectivity_restored(&self) {
        if let Some(tx) = self.tx.upgrade() {
            let _ = tx.send(FeedMessage::ConnectivityRestored);
        }
    }
}
