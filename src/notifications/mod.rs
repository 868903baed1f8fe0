//! Notification entities and page preparation.

mod models;
mod sanitize;

pub use models::{
    Notification, NotificationCategory, NotificationPage, NotificationType, PageMeta,
};
pub use sanitize::prepare_notifications;
