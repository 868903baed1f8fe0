//! Serialized dispatch loop of a feed.
//!
//! The dispatcher is the feed's single thread of control: it owns the
//! [`FeedState`] and the consumer sink, and it is the only place either is
//! touched. Public commands and background-task completions arrive over one
//! FIFO channel, so the `is_loading` check and set are a single step here —
//! there is no check-then-act window for two loads to slip through.
//!
//! Transport calls run as spawned tasks on the runtime's worker pool. They
//! never see feed state; they only post completion messages back.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{ApiError, NotificationApi};
use crate::config::FeedConfig;
use crate::connectivity::{ConnectivityHub, SubscriptionId};
use crate::notifications::{prepare_notifications, Notification, NotificationCategory, PageMeta};

use super::consumer::{CategoryReadObserver, FeedConsumer};
use super::handle::{FeedConnectivityListener, FeedMessage};
use super::state::FeedState;

pub(crate) struct FeedDispatcher {
    state: FeedState,
    consumer: Option<Arc<dyn FeedConsumer>>,
    api: Arc<dyn NotificationApi>,
    config: FeedConfig,
    connectivity: Option<Arc<ConnectivityHub>>,
    connectivity_subscription: Option<SubscriptionId>,
    read_observer: Option<Arc<dyn CategoryReadObserver>>,
    rx: mpsc::UnboundedReceiver<FeedMessage>,
    /// Weak so that dropping every public handle closes the channel and
    /// ends the loop; workers upgrade it for the lifetime of one call.
    tx: mpsc::WeakUnboundedSender<FeedMessage>,
}

impl FeedDispatcher {
    pub(crate) fn new(
        api: Arc<dyn NotificationApi>,
        config: FeedConfig,
        connectivity: Option<Arc<ConnectivityHub>>,
        read_observer: Option<Arc<dyn CategoryReadObserver>>,
        rx: mpsc::UnboundedReceiver<FeedMessage>,
        tx: mpsc::WeakUnboundedSender<FeedMessage>,
    ) -> Self {
        Self {
            state: FeedState::new(),
            consumer: None,
            api,
            config,
            connectivity,
            connectivity_subscription: None,
            read_observer,
            rx,
            tx,
        }
    }

    /// Main dispatch loop - call from a spawned task.
    pub(crate) async fn run(mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                maybe_message = self.rx.recv() => {
                    match maybe_message {
                        Some(message) => self.handle_message(message),
                        None => {
                            debug!("all feed handles dropped, dispatcher stopping");
                            break;
                        }
                    }
                }
                _ = shutdown.cancelled() => {
                    debug!("feed dispatcher shutting down");
                    break;
                }
            }
        }

        if let (Some(hub), Some(id)) = (&self.connectivity, self.connectivity_subscription.take()) {
            hub.unsubscribe(id);
        }
    }

    fn handle_message(&mut self, message: FeedMessage) {
        match message {
            FeedMessage::InitialLoad { category, reply } => {
                self.handle_initial_load(category, reply)
            }
            FeedMessage::LoadMore => self.handle_load_more(),
            FeedMessage::PageFetched {
                items,
                meta,
                initial,
            } => self.handle_page_fetched(items, meta, initial),
            FeedMessage::PageFailed { initial } => self.handle_page_failed(initial),
            FeedMessage::MarkAsRead { id } => self.spawn_mark_as_read(id),
            FeedMessage::MarkOutcome { id, outcome } => self.handle_mark_outcome(id, outcome),
            FeedMessage::MarkAllAsRead => self.handle_mark_all(),
            FeedMessage::MarkAllOutcome { outcome } => self.handle_mark_all_outcome(outcome),
            FeedMessage::PropagateCategoryRead { category } => self.handle_propagate(category),
            FeedMessage::NotificationShouldBeRead { id } => self.apply_confirmed_read(id),
            FeedMessage::Attach { consumer } => self.handle_attach(consumer),
            FeedMessage::Detach => self.handle_detach(),
            FeedMessage::ConnectivityRestored => self.handle_connectivity_restored(),
            FeedMessage::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot());
            }
        }
    }

    // ---- loading ----

    fn handle_initial_load(
        &mut self,
        category: NotificationCategory,
        reply: Option<oneshot::Sender<bool>>,
    ) {
        let ignored = self.state.is_loading || self.state.has_loaded_once;
        if !ignored {
            // The first call fixes the binding; the gate makes later
            // categories irrelevant.
            let bound = *self.state.bound_category.get_or_insert(category);
            self.state.is_loading = true;
            self.emit(|c| c.on_loading());
            if !self.state.is_empty() {
                // Re-entry after detach: show the stale cache while fresh
                // data loads.
                self.state.has_loaded_once = true;
                self.emit(|c| c.on_items_available(self.state.items()));
            }
            self.spawn_fetch(bound, self.state.next_page, true);
        } else {
            debug!("initial load ignored: already loading or already shown");
        }
        if let Some(reply) = reply {
            let _ = reply.send(ignored);
        }
    }

    fn handle_load_more(&mut self) {
        if self.state.is_loading || !self.state.has_next_page {
            return;
        }
        let Some(category) = self.state.bound_category else {
            debug!("load more before initial load, ignoring");
            return;
        };
        self.state.is_loading = true;
        self.emit(|c| c.on_loading_footer());
        self.spawn_fetch(category, self.state.next_page, false);
    }

    fn handle_page_fetched(&mut self, items: Vec<Notification>, meta: PageMeta, initial: bool) {
        self.state.has_next_page = meta.has_next;
        self.state.next_page = meta.page + 1;
        self.state.append_page(items);
        if initial && self.consumer.is_none() {
            // Nobody to show the result to: keep the data, but let the next
            // attach + initial_load repeat the display.
            self.state.has_loaded_once = false;
        } else {
            self.state.has_loaded_once = true;
            self.emit(|c| c.on_items_available(self.state.items()));
        }
        self.state.is_loading = false;
    }

    fn handle_page_failed(&mut self, initial: bool) {
        debug!(
            "page fetch failed (initial={}), feed stays retryable",
            initial
        );
        self.emit(|c| c.on_connection_problem());
        self.state.is_loading = false;
    }

    // ---- read state ----

    fn handle_mark_outcome(&mut self, id: u64, outcome: Result<bool, ApiError>) {
        match outcome {
            Ok(true) => self.apply_confirmed_read(id),
            Ok(false) => {
                debug!("backend rejected mark-as-read for notification {}", id);
                self.emit_mark_rejected(id);
            }
            Err(err) => {
                warn!("mark-as-read for notification {} failed: {}", id, err);
                self.emit_mark_rejected(id);
            }
        }
    }

    fn apply_confirmed_read(&mut self, id: u64) {
        if let Some(position) = self.state.confirm_read(id) {
            self.emit(|c| c.on_mark_as_read(position, id));
        }
    }

    fn emit_mark_rejected(&self, id: u64) {
        match self.state.position_of(id) {
            Some(position) => self.emit(|c| c.on_mark_rejected(position, id)),
            None => debug!("notification {} has no recorded position, skipping rollback", id),
        }
    }

    fn handle_mark_all(&mut self) {
        let Some(category) = self.state.bound_category else {
            warn!("mark-all requested with no bound category");
            return;
        };
        self.emit(|c| c.on_marking_all_started());
        self.spawn_mark_all(category);
    }

    fn handle_mark_all_outcome(&mut self, outcome: Result<bool, ApiError>) {
        match outcome {
            Ok(true) => {
                self.state.mark_all_read();
                if let Some(category) = self.state.bound_category {
                    if let Some(observer) = &self.read_observer {
                        observer.on_category_marked_read(category);
                    }
                }
                self.emit(|c| c.on_mark_all_succeeded());
            }
            Ok(false) => {
                warn!("backend rejected mark-all request");
            }
            Err(err) => {
                warn!("mark-all failed: {}", err);
                self.emit(|c| c.on_mark_all_connection_problem());
            }
        }
        self.emit(|c| c.on_reenable_mark_all_control());
    }

    fn handle_propagate(&mut self, category: NotificationCategory) {
        let Some(bound) = self.state.bound_category else {
            return;
        };
        if bound == category {
            // Already applied directly by the bulk mark.
            return;
        }
        if bound != NotificationCategory::All && category != NotificationCategory::All {
            // Disjoint categories share no items.
            return;
        }
        for (position, id) in self.state.mark_category_read(category) {
            self.emit(|c| c.on_mark_as_read(position, id));
        }
    }

    // ---- lifecycle ----

    fn handle_attach(&mut self, consumer: Arc<dyn FeedConsumer>) {
        self.consumer = Some(consumer);
        if let Some(hub) = &self.connectivity {
            if self.connectivity_subscription.is_none() {
                let listener = Arc::new(FeedConnectivityListener::new(self.tx.clone()));
                self.connectivity_subscription = Some(hub.subscribe(listener));
            }
        }
    }

    fn handle_detach(&mut self) {
        self.consumer = None;
        if let (Some(hub), Some(id)) = (&self.connectivity, self.connectivity_subscription.take())
        {
            hub.unsubscribe(id);
        }
    }

    fn handle_connectivity_restored(&mut self) {
        if self.state.is_empty() {
            if let Some(category) = self.state.bound_category {
                debug!("connectivity restored with empty feed, retrying initial load");
                self.handle_initial_load(category, None);
            }
        }
    }

    // ---- background work ----

    fn spawn_fetch(&self, category: NotificationCategory, page: u32, initial: bool) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let api = self.api.clone();
        let base_url = self.config.base_url.clone();
        tokio::spawn(async move {
            match api.fetch_notifications(category, page).await {
                Ok(fetched) => {
                    let meta = fetched.meta;
                    let items = prepare_notifications(fetched.notifications, &base_url);
                    let _ = tx.send(FeedMessage::PageFetched {
                        items,
                        meta,
                        initial,
                    });
                }
                Err(err) => {
                    warn!("notification page fetch failed: {}", err);
                    let _ = tx.send(FeedMessage::PageFailed { initial });
                }
            }
        });
    }

    fn spawn_mark_as_read(&self, id: u64) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let api = self.api.clone();
        tokio::spawn(async move {
            let outcome = api.set_read_status(id, true).await;
            let _ = tx.send(FeedMessage::MarkOutcome { id, outcome });
        });
    }

    fn spawn_mark_all(&self, category: NotificationCategory) {
        let Some(tx) = self.tx.upgrade() else {
            return;
        };
        let api = self.api.clone();
        tokio::spawn(async move {
            let outcome = api.mark_all_read(category).await;
            let _ = tx.send(FeedMessage::MarkAllOutcome { outcome });
        });
    }

    /// Deliver an event to the consumer, or silently do nothing while
    /// detached.
    fn emit<F: FnOnce(&dyn FeedConsumer)>(&self, f: F) {
        if let Some(consumer) = &self.consumer {
            f(consumer.as_ref());
        }
    }
}
