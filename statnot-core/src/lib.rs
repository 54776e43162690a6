//! Core of the statnot daemon: the notification registry and the display
//! scheduler that merges notifications into a periodically refreshed
//! status line.
//!
//! Nothing in this crate knows about D-Bus or processes; the status
//! command and the display are reached through the [`StatusSource`] and
//! [`DisplaySink`] traits.

pub mod error;
pub mod registry;
pub mod scheduler;
pub mod sink;

pub use error::{DisplayError, StatusError};
pub use registry::{
    truncate_chars, NotificationEntry, NotificationRegistry, QueueMode, RegistryConfig,
};
pub use scheduler::{DisplayScheduler, DisplayState, SchedulerConfig};
pub use sink::{first_line, DisplaySink, StatusSource};
