//! Normalization of inbound notification requests.

use std::sync::Arc;
use std::time::Duration;

use statnot_core::NotificationRegistry;
use tracing::{debug, info};

use crate::config::Config;
use crate::text;

/// Protocol revision reported by `GetServerInformation`.
pub const SPEC_VERSION: &str = "1.2";

const VENDOR: &str = "https://github.com/halhen/statnot";

/// A `Notify` call as received, before normalization.
#[derive(Debug, Clone, Default)]
pub struct NotifyRequest {
    pub app_name: String,
    /// Zero asks for a new id.
    pub replaces_id: u32,
    pub summary: String,
    pub body: String,
    /// Requested timeout in ms; negative means "server default".
    pub expire_timeout: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInformation {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub spec_version: String,
}

/// Turns protocol requests into registry upserts.
pub struct NotifyAdapter {
    registry: Arc<NotificationRegistry>,
    default_timeout_ms: u32,
    max_timeout_ms: u32,
    strip_markup: bool,
}

impl NotifyAdapter {
    pub fn new(registry: Arc<NotificationRegistry>, config: &Config) -> Self {
        Self {
            registry,
            default_timeout_ms: config.default_timeout_ms,
            max_timeout_ms: config.max_timeout_ms,
            strip_markup: config.strip_markup,
        }
    }

    pub fn registry(&self) -> &Arc<NotificationRegistry> {
        &self.registry
    }

    /// Requested timeout, or the default when negative or above the maximum.
    pub fn effective_timeout(&self, expire_timeout: i32) -> Duration {
        let ms = match u32::try_from(expire_timeout) {
            Ok(ms) if ms <= self.max_timeout_ms => ms,
            _ => self.default_timeout_ms,
        };
        Duration::from_millis(u64::from(ms))
    }

    /// Summary and body joined into one trimmed line of text.
    pub fn compose_text(&self, summary: &str, body: &str) -> String {
        let joined = format!("{summary} {body}");
        let joined = if self.strip_markup {
            text::sanitize(&joined)
        } else {
            joined
        };
        joined.trim().to_string()
    }

    /// Queue a notification. Returns the id assigned to it.
    pub fn notify(&self, request: &NotifyRequest) -> u32 {
        let timeout = self.effective_timeout(request.expire_timeout);
        let text = self.compose_text(&request.summary, &request.body);
        let replaces = (request.replaces_id != 0).then_some(request.replaces_id);

        let id = self.registry.upsert(replaces, &text, timeout);
        debug!(
            id,
            app = %request.app_name,
            timeout_ms = timeout.as_millis() as u64,
            "notification received"
        );
        id
    }

    /// Closing is accepted but does not touch the queue.
    pub fn close(&self, id: u32) {
        info!(id, "close requested, notification left to expire");
    }

    pub fn capabilities(&self) -> Vec<String> {
        vec!["body".to_string()]
    }

    pub fn server_information(&self) -> ServerInformation {
        ServerInformation {
            name: env!("CARGO_PKG_NAME").to_string(),
            vendor: VENDOR.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            spec_version: SPEC_VERSION.to_string(),
        }
    }
}
