//! Notification center: the family of per-category feeds.
//!
//! Category views cache overlapping data (`All` shares items with every
//! specific category) without a shared store, so a confirmed bulk mark in
//! one feed must be forwarded to the others. The center owns that wiring:
//! it hands out one feed per category over shared collaborators and fans a
//! feed's confirmed bulk mark out to every sibling via
//! `propagate_category_read`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

use crate::api::NotificationApi;
use crate::config::FeedConfig;
use crate::connectivity::ConnectivityHub;
use crate::feed::{CategoryReadObserver, NotificationFeed};
use crate::notifications::NotificationCategory;

/// Lazily built set of sibling feeds over one transport and config.
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

struct CenterInner {
    api: Arc<dyn NotificationApi>,
    config: FeedConfig,
    connectivity: Arc<ConnectivityHub>,
    feeds: Mutex<HashMap<NotificationCategory, NotificationFeed>>,
}

impl NotificationCenter {
    pub fn new(api: Arc<dyn NotificationApi>, config: FeedConfig) -> Self {
        Self {
            inner: Arc::new(CenterInner {
                api,
                config,
                connectivity: Arc::new(ConnectivityHub::new()),
                feeds: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Get the feed for a category, creating it on first use.
    ///
    /// The handle is cheap to clone; the underlying feed lives until
    /// [`shutdown`](Self::shutdown).
    pub fn feed(&self, category: NotificationCategory) -> NotificationFeed {
        let mut feeds = self.inner.feeds.lock().unwrap();
        feeds
            .entry(category)
            .or_insert_with(|| {
                let observer = Arc::new(SiblingPropagator {
                    center: Arc::downgrade(&self.inner),
                });
                NotificationFeed::spawn(
                    self.inner.api.clone(),
                    self.inner.config.clone(),
                    Some(self.inner.connectivity.clone()),
                    Some(observer),
                )
            })
            .clone()
    }

    /// Hub the feeds subscribe to while their consumers are attached.
    pub fn connectivity(&self) -> Arc<ConnectivityHub> {
        self.inner.connectivity.clone()
    }

    /// Report that the network came back; empty feeds retry their load.
    pub fn on_connectivity_restored(&self) {
        self.inner.connectivity.notify_restored();
    }

    /// Stop every feed's dispatcher.
    pub fn shutdown(&self) {
        let feeds = self.inner.feeds.lock().unwrap();
        for feed in feeds.values() {
            feed.shutdown();
        }
    }
}

/// Forwards one feed's confirmed bulk mark to every sibling feed.
///
/// Holds the center weakly: feeds must not keep the center alive, and a
/// propagation after teardown is a no-op.
struct SiblingPropagator {
    center: Weak<CenterInner>,
}

impl CategoryReadObserver for SiblingPropagator {
    fn on_category_marked_read(&self, category: NotificationCategory) {
        let Some(center) = self.center.upgrade() else {
            return;
        };
        let feeds = center.feeds.lock().unwrap();
        for (bound, feed) in feeds.iter() {
            if *bound != category {
                feed.propagate_category_read(category);
            }
        }
    }
}
