//! Inbound side of the daemon: the freedesktop notification protocol.
//!
//! - `adapter` normalizes `Notify` calls (timeout clamp, text composition)
//!   and hands them to the registry
//! - `dbus` exposes the adapter as `org.freedesktop.Notifications`

pub mod adapter;
pub mod dbus;

pub use adapter::{NotifyAdapter, NotifyRequest, ServerInformation};
pub use dbus::NotificationServer;
