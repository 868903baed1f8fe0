//! HTTP client for the notification backend.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::notifications::{NotificationCategory, NotificationPage};

use super::{ApiError, NotificationApi};

/// reqwest-backed implementation of [`NotificationApi`].
pub struct HttpNotificationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNotificationApi {
    /// Create a new backend client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend (e.g., "https://gradus.example.com")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    /// Get the base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn fetch_notifications(
        &self,
        category: NotificationCategory,
        page: u32,
    ) -> Result<NotificationPage, ApiError> {
        let url = format!("{}/api/notifications", self.base_url);
        debug!(
            "fetching notifications: type={} page={}",
            category.as_query_value(),
            page
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("type", category.as_query_value()),
                ("page", &page.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: response.status(),
                url,
            });
        }

        response.json().await.map_err(ApiError::Decode)
    }

    async fn set_read_status(&self, id: u64, read: bool) -> Result<bool, ApiError> {
        let url = format!("{}/api/notifications/{}/read-status", self.base_url, id);

        let response = self
            .client
            .put(&url)
            .json(&json!({ "is_unread": !read }))
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn mark_all_read(&self, category: NotificationCategory) -> Result<bool, ApiError> {
        let url = format!("{}/api/notifications/mark-all-read", self.base_url);

        let response = self
            .client
            .post(&url)
            .query(&[("type", category.as_query_value())])
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
