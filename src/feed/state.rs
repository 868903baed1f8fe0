//! Per-feed session cache.
//!
//! Owns the ordered notification collection, the id→position index and the
//! pagination/loading flags. Items are append-only: positions handed out at
//! insertion time stay valid for the life of the feed, which is what lets
//! read-state events reference positions without revalidation.

use std::collections::HashMap;

use crate::notifications::{Notification, NotificationCategory};

/// Point-in-time copy of a feed's cache and flags.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub items: Vec<Notification>,
    pub is_loading: bool,
    pub has_loaded_once: bool,
    pub has_next_page: bool,
    pub next_page: u32,
    pub bound_category: Option<NotificationCategory>,
}

/// Mutable feed state, owned exclusively by the dispatcher.
pub(crate) struct FeedState {
    items: Vec<Notification>,
    id_to_position: HashMap<u64, usize>,
    pub is_loading: bool,
    pub has_loaded_once: bool,
    pub has_next_page: bool,
    pub next_page: u32,
    pub bound_category: Option<NotificationCategory>,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            id_to_position: HashMap::new(),
            is_loading: false,
            has_loaded_once: false,
            has_next_page: true,
            next_page: 1,
            bound_category: None,
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append one fetched page, indexing ids at their final positions.
    pub fn append_page(&mut self, notifications: Vec<Notification>) {
        let offset = self.items.len();
        for (shift, notification) in notifications.into_iter().enumerate() {
            if let Some(id) = notification.id {
                self.id_to_position.insert(id, offset + shift);
            }
            self.items.push(notification);
        }
    }

    pub fn position_of(&self, id: u64) -> Option<usize> {
        self.id_to_position.get(&id).copied()
    }

    /// Flip one notification to read, if it is indexed and still unread.
    ///
    /// Returns the position when a flip happened, `None` otherwise — a
    /// repeated confirmation for the same id is a no-op.
    pub fn confirm_read(&mut self, id: u64) -> Option<usize> {
        let position = self.position_of(id)?;
        let item = self.items.get_mut(position)?;
        if item.is_unread() {
            item.is_unread = Some(false);
            Some(position)
        } else {
            None
        }
    }

    /// Set every cached item read, regardless of indexing.
    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            item.is_unread = Some(false);
        }
    }

    /// Apply a sibling feed's bulk read to the local cache.
    ///
    /// Selects still-unread items whose mapped category matches (`All`
    /// selects everything), flips the indexed ones and returns their
    /// `(position, id)` pairs for consumer updates. Items whose id was never
    /// recorded are skipped.
    pub fn mark_category_read(
        &mut self,
        category: NotificationCategory,
    ) -> Vec<(usize, u64)> {
        let mut marked = Vec::new();
        for item in &mut self.items {
            if !item.is_unread() {
                continue;
            }
            if category != NotificationCategory::All && item.category() != category {
                continue;
            }
            let Some(id) = item.id else {
                continue;
            };
            let Some(position) = self.id_to_position.get(&id).copied() else {
                continue;
            };
            item.is_unread = Some(false);
            marked.push((position, id));
        }
        marked
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            items: self.items.clone(),
            is_loading: self.is_loading,
            has_loaded_once: self.has_loaded_once,
            has_next_page: self.has_next_page,
            next_page: self.next_page,
            bound_category: self.bound_category,
        }
    }
}
