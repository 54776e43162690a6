//! statnot - status and notifications for lightweight window managers.
//!
//! Receives desktop notifications on the session bus and merges them with
//! the output of a status command into the single line of text shown by
//! bars like dwm's.

pub mod config;
pub mod daemon;
pub mod display;
pub mod notify;
pub mod status;
pub mod text;

pub use config::{Config, ConfigError, DisplayKind};
pub use notify::{NotifyAdapter, NotifyRequest};
