//! Preparation of fetched notifications for display.
//!
//! Pages come back from the backend with two defects the rest of the engine
//! must never see: items without displayable text, and HTML bodies whose
//! hyperlinks are root-relative and would break outside the web frontend.

use tracing::debug;

use super::models::Notification;

/// Filter out blank items and absolutize root-relative links.
///
/// Items whose `html_text` is missing or blank are dropped entirely; they
/// are never stored nor indexed. Retained items get every `href="/..."`
/// rewritten against `base_url`. Absolute links are left untouched.
pub fn prepare_notifications(
    notifications: Vec<Notification>,
    base_url: &str,
) -> Vec<Notification> {
    let before = notifications.len();

    let prepared: Vec<Notification> = notifications
        .into_iter()
        .filter(|n| {
            n.html_text
                .as_ref()
                .map(|text| !text.trim().is_empty())
                .unwrap_or(false)
        })
        .map(|mut n| {
            if let Some(text) = n.html_text.take() {
                n.html_text = Some(rewrite_relative_links(&text, base_url));
            }
            n
        })
        .collect();

    debug!(
        "prepared notification page: {} items before filter, {} after",
        before,
        prepared.len()
    );

    prepared
}

/// Rewrite root-relative `href` targets into absolute ones.
///
/// `base_url` is expected without a trailing slash, so `href="/x"` becomes
/// `href="<base_url>/x"`.
fn rewrite_relative_links(html: &str, base_url: &str) -> String {
    html.replace("href=\"/", &format!("href=\"{}/", base_url))
}
