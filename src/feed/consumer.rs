//! Output-event surface of a feed.

use crate::notifications::{Notification, NotificationCategory};

/// Sink for everything a feed wants displayed.
///
/// A consumer is bound with [`NotificationFeed::attach`] and unbound with
/// [`NotificationFeed::detach`]; while unbound, every emission is a silent
/// no-op. Callbacks arrive on the feed's dispatcher task in delivery order
/// and must not block.
///
/// [`NotificationFeed::attach`]: super::NotificationFeed::attach
/// [`NotificationFeed::detach`]: super::NotificationFeed::detach
pub trait FeedConsumer: Send + Sync {
    /// An initial load has started.
    fn on_loading(&self);

    /// The cache changed; `items` is the full current snapshot.
    fn on_items_available(&self, items: &[Notification]);

    /// A load failed at the transport; prior cache is preserved.
    fn on_connection_problem(&self);

    /// A load-more fetch has started.
    fn on_loading_footer(&self);

    /// The notification at `position` is now read.
    fn on_mark_as_read(&self, position: usize, id: u64);

    /// A mark-as-read was rejected; roll back any optimistic change at `position`.
    fn on_mark_rejected(&self, position: usize, id: u64);

    /// A bulk mark-as-read has started; disable the control.
    fn on_marking_all_started(&self);

    /// The bulk mark-as-read was applied.
    fn on_mark_all_succeeded(&self);

    /// The bulk mark-as-read failed at the transport.
    fn on_mark_all_connection_problem(&self);

    /// Re-enable the bulk mark-as-read control, whatever the outcome was.
    fn on_reenable_mark_all_control(&self);
}

/// Hook invoked when a feed's bulk mark-as-read is confirmed by the backend.
///
/// This is how a confirmed bulk read reaches sibling feeds caching
/// overlapping items: the observer forwards the category to every other
/// feed's `propagate_category_read`. There is no shared store behind this,
/// only message passing.
pub trait CategoryReadObserver: Send + Sync {
    fn on_category_marked_read(&self, category: NotificationCategory);
}
