//! Connectivity-restoration signaling.
//!
//! A small publish/subscribe registry: feeds subscribe while a consumer is
//! attached and get poked when the network comes back, so a feed that failed
//! its very first load can retry. Notification order among subscribers is
//! unspecified.

use std::sync::{Arc, Mutex};

/// Handle identifying one subscription, returned by [`ListenerHub::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Generic listener registry with id-keyed removal.
pub struct ListenerHub<L: ?Sized> {
    inner: Mutex<HubInner<L>>,
}

struct HubInner<L: ?Sized> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Arc<L>)>,
}

impl<L: ?Sized> ListenerHub<L> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HubInner {
                next_id: 0,
                listeners: Vec::new(),
            }),
        }
    }

    /// Register a listener and return the id needed to remove it again.
    pub fn subscribe(&self, listener: Arc<L>) -> SubscriptionId {
        let mut inner = self.inner.lock().unwrap();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, listener));
        id
    }

    /// Remove a previously registered listener. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.inner.lock().unwrap();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    /// Number of currently registered listeners.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` for every registered listener.
    ///
    /// Listeners are snapshotted first so a callback may subscribe or
    /// unsubscribe without deadlocking the hub.
    pub fn for_each(&self, mut f: impl FnMut(&L)) {
        let snapshot: Vec<Arc<L>> = {
            let inner = self.inner.lock().unwrap();
            inner
                .listeners
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect()
        };
        for listener in &snapshot {
            f(listener);
        }
    }
}

impl<L: ?Sized> Default for ListenerHub<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of connectivity-restored events.
pub trait ConnectivityListener: Send + Sync {
    fn on_connectivity_restored(&self);
}

/// Registry of feeds interested in connectivity restoration.
pub type ConnectivityHub = ListenerHub<dyn ConnectivityListener>;

impl ConnectivityHub {
    /// Tell every subscriber the network is available again.
    pub fn notify_restored(&self) {
        self.for_each(|listener| listener.on_connectivity_restored());
    }
}
