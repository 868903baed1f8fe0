//! Transport collaborator contract for the notification backend.
//!
//! The engine never talks HTTP directly; it goes through [`NotificationApi`]
//! so tests can substitute a scripted transport. [`HttpNotificationApi`] is
//! the production implementation.

mod client;

pub use client::HttpNotificationApi;

use async_trait::async_trait;
use thiserror::Error;

use crate::notifications::{NotificationCategory, NotificationPage};

/// Errors surfaced by the transport collaborator.
///
/// All variants are recoverable from the engine's point of view: they are
/// converted into consumer-facing "connection problem" events and never
/// propagate as faults.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("malformed response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Backend operations the feed engine depends on.
///
/// Write operations return `Ok(false)` when the backend answers with a
/// well-formed rejection; transport failures are `Err`.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Fetch one page of notifications for a category.
    async fn fetch_notifications(
        &self,
        category: NotificationCategory,
        page: u32,
    ) -> Result<NotificationPage, ApiError>;

    /// Set the read flag of a single notification.
    async fn set_read_status(&self, id: u64, read: bool) -> Result<bool, ApiError>;

    /// Mark every notification of a category as read.
    async fn mark_all_read(&self, category: NotificationCategory) -> Result<bool, ApiError>;
}
