//! Notification data models

use serde::{Deserialize, Serialize};

/// Coarse notification grouping.
///
/// Used both as the fetch filter sent to the backend and as the binding
/// key of a feed instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    All,
    Comments,
    Default,
    Review,
    Teach,
    Learn,
}

impl NotificationCategory {
    /// Value used for the `type` query parameter on fetch and bulk-mark calls.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            NotificationCategory::All => "all",
            NotificationCategory::Comments => "comments",
            NotificationCategory::Default => "default",
            NotificationCategory::Review => "review",
            NotificationCategory::Teach => "teach",
            NotificationCategory::Learn => "learn",
        }
    }
}

/// Fine-grained notification type as reported by the backend.
///
/// `Absent` absorbs wire values this client does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Comments,
    Other,
    Review,
    Teach,
    Learn,
    #[serde(other)]
    Absent,
}

impl NotificationType {
    /// Map a type to the single category it belongs to.
    pub fn category(&self) -> NotificationCategory {
        match self {
            NotificationType::Comments => NotificationCategory::Comments,
            NotificationType::Other => NotificationCategory::Default,
            NotificationType::Review => NotificationCategory::Review,
            NotificationType::Teach => NotificationCategory::Teach,
            NotificationType::Learn => NotificationCategory::Learn,
            NotificationType::Absent => NotificationCategory::All,
        }
    }
}

/// A single notification as fetched from the backend.
///
/// Identity is `id`; two records with the same id refer to the same logical
/// notification. Records without an id can be displayed but are never
/// indexed for read-state updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub html_text: Option<String>,
    #[serde(default)]
    pub is_unread: Option<bool>,
    #[serde(default, rename = "type")]
    pub notification_type: Option<NotificationType>,
}

impl Notification {
    /// Category this notification belongs to; untyped records fall into `All`.
    pub fn category(&self) -> NotificationCategory {
        self.notification_type
            .map(|t| t.category())
            .unwrap_or(NotificationCategory::All)
    }

    /// Whether the notification is currently unread; a missing flag reads as false.
    pub fn is_unread(&self) -> bool {
        self.is_unread.unwrap_or(false)
    }
}

/// Pagination metadata returned alongside every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub has_next: bool,
}

/// One page of a paginated notification listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub meta: PageMeta,
}

impl NotificationPage {
    /// Page number the client should request after consuming this page.
    pub fn next_page(&self) -> u32 {
        self.meta.page + 1
    }
}
