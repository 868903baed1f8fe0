//! Gradus Notification Center
//!
//! Client-side engine for loading a paginated notification feed and keeping
//! its read state in sync with the backend. Each category view owns an
//! in-memory session cache fed off the interaction path by background
//! transport calls; results come back over one serialized dispatch channel,
//! so consumers observe a deterministic event order. Bulk read-state changes
//! are propagated between overlapping category views by message passing,
//! without a shared store.

pub mod api;
pub mod center;
pub mod config;
pub mod connectivity;
pub mod feed;
pub mod notifications;

// Re-export commonly used types for convenience
pub use api::{ApiError, HttpNotificationApi, NotificationApi};
pub use center::NotificationCenter;
pub use config::FeedConfig;
pub use feed::{CategoryReadObserver, FeedConsumer, FeedSnapshot, NotificationFeed};
pub use notifications::{
    Notification, NotificationCategory, NotificationPage, NotificationType, PageMeta,
};

// Re-export for testing
#[cfg(feature = "mock")]
pub use api::MockNotificationApi;
