//! Common test infrastructure
//!
//! A scripted transport and a recording consumer, enough to drive whole
//! feed scenarios end-to-end without a network. Tests import from this
//! module, not from the submodules.

// Each test binary compiles its own copy and none uses all of it.
#![allow(dead_code)]

mod api;
mod consumer;

pub use api::{transport_error, FakeApi};
pub use consumer::{ConsumerEvent, RecordingConsumer};

use std::sync::Once;

static INIT: Once = Once::new();

/// Route engine logs to the test output; set RUST_LOG to see them.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

use gradus_notification_center::{Notification, NotificationType};

/// Unread notification with the usual shape of backend payloads.
#[allow(dead_code)]
pub fn unread(id: u64, notification_type: Option<NotificationType>) -> Notification {
    Notification {
        id: Some(id),
        html_text: Some(format!("<p>notification {}</p>", id)),
        is_unread: Some(true),
        notification_type,
    }
}
