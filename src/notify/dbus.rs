//! D-Bus interface for the notification daemon.
//!
//! Bus name: `org.freedesktop.Notifications`
//! Object path: `/org/freedesktop/Notifications`

use std::collections::HashMap;
use std::sync::Arc;

use zbus::interface;
use zbus::object_server::SignalEmitter;
use zbus::zvariant::OwnedValue;

use super::adapter::{NotifyAdapter, NotifyRequest};

pub const BUS_NAME: &str = "org.freedesktop.Notifications";
pub const OBJECT_PATH: &str = "/org/freedesktop/Notifications";

/// `NotificationClosed` reason: closed by a call to `CloseNotification`.
pub const CLOSED_BY_CALL: u32 = 3;

/// D-Bus interface implementation.
pub struct NotificationServer {
    adapter: Arc<NotifyAdapter>,
}

impl NotificationServer {
    pub fn new(adapter: Arc<NotifyAdapter>) -> Self {
        Self { adapter }
    }
}

#[interface(name = "org.freedesktop.Notifications")]
impl NotificationServer {
    /// Post a notification. Returns its id.
    ///
    /// Icons, actions and hints are accepted and ignored.
    async fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        _app_icon: &str,
        summary: &str,
        body: &str,
        _actions: Vec<String>,
        _hints: HashMap<String, OwnedValue>,
        expire_timeout: i32,
    ) -> u32 {
        self.adapter.notify(&NotifyRequest {
            app_name: app_name.to_string(),
            replaces_id,
            summary: summary.to_string(),
            body: body.to_string(),
            expire_timeout,
        })
    }

    async fn get_capabilities(&self) -> Vec<String> {
        self.adapter.capabilities()
    }

    #[zbus(out_args("name", "vendor", "version", "spec_version"))]
    async fn get_server_information(&self) -> (String, String, String, String) {
        let info = self.adapter.server_information();
        (info.name, info.vendor, info.version, info.spec_version)
    }

    /// Accepted for compatibility; clients still get their `NotificationClosed`.
    async fn close_notification(
        &self,
        id: u32,
        #[zbus(signal_emitter)] emitter: SignalEmitter<'_>,
    ) -> zbus::fdo::Result<()> {
        self.adapter.close(id);
        Self::notification_closed(&emitter, id, CLOSED_BY_CALL).await?;
        Ok(())
    }

    #[zbus(signal)]
    async fn notification_closed(
        emitter: &SignalEmitter<'_>,
        id: u32,
        reason: u32,
    ) -> zbus::Result<()>;
}
