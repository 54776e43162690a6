//! Notification registry: an insertion-ordered queue keyed by id.
//!
//! Entries are merged in place when their id is already queued, and
//! evicted lazily on every read according to the [`QueueMode`].

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::debug;

/// A notification waiting to be (or being) displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEntry {
    pub id: u32,
    pub text: String,
    /// How long the entry stays visible once shown. Zero means sticky.
    pub timeout: Duration,
}

impl NotificationEntry {
    pub fn new(id: u32, text: impl Into<String>, timeout: Duration) -> Self {
        Self {
            id,
            text: text.into(),
            timeout,
        }
    }

    /// Sticky entries never expire by elapsed time.
    pub fn is_sticky(&self) -> bool {
        self.timeout.is_zero()
    }
}

/// How the queue behaves when more than one notification is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueMode {
    /// Show every notification in turn; leading sticky entries are skipped
    /// once something else is queued behind them.
    #[default]
    Queue,
    /// Collapse to the most recently received notification.
    LatestOnly,
}

impl From<bool> for QueueMode {
    fn from(queue_notifications: bool) -> Self {
        if queue_notifications {
            QueueMode::Queue
        } else {
            QueueMode::LatestOnly
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// Characters kept per notification text.
    pub max_length: usize,
    pub mode: QueueMode,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_length: 100,
            mode: QueueMode::Queue,
        }
    }
}

struct Queue {
    entries: VecDeque<NotificationEntry>,
    next_id: u32,
}

impl Queue {
    /// Next generated id not already taken by a queued entry.
    fn generate_id(&mut self) -> u32 {
        loop {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1).max(1);
            if !self.entries.iter().any(|e| e.id == id) {
                return id;
            }
        }
    }
}

/// Shared notification queue.
///
/// All operations take the internal lock for the duration of an in-memory
/// update only; nothing here blocks or calls out.
pub struct NotificationRegistry {
    config: RegistryConfig,
    queue: Mutex<Queue>,
    changed: Notify,
}

impl Default for NotificationRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl NotificationRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            queue: Mutex::new(Queue {
                entries: VecDeque::new(),
                next_id: 1,
            }),
            changed: Notify::new(),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Insert or replace a notification. Returns the id it is stored under.
    ///
    /// `None` or `Some(0)` assigns the next generated id. A known id keeps
    /// its queue position and only has its text and timeout replaced.
    pub fn upsert(&self, id: Option<u32>, text: &str, timeout: Duration) -> u32 {
        let text = truncate_chars(text, self.config.max_length);

        let id = {
            let mut queue = self.queue.lock();
            let id = match id.filter(|&id| id != 0) {
                Some(id) => id,
                None => queue.generate_id(),
            };

            if let Some(existing) = queue.entries.iter_mut().find(|e| e.id == id) {
                debug!(id, "replacing queued notification");
                existing.text = text.to_string();
                existing.timeout = timeout;
            } else {
                debug!(id, queued = queue.entries.len() + 1, "queueing notification");
                queue
                    .entries
                    .push_back(NotificationEntry::new(id, text, timeout));
            }
            id
        };

        self.changed.notify_one();
        id
    }

    /// Head of the queue after eviction.
    pub fn peek(&self) -> Option<NotificationEntry> {
        let mut queue = self.queue.lock();
        self.evict(&mut queue.entries);
        queue.entries.front().cloned()
    }

    /// Head of the queue after eviction, removed from the queue.
    pub fn pop(&self) -> Option<NotificationEntry> {
        let mut queue = self.queue.lock();
        self.evict(&mut queue.entries);
        queue.entries.pop_front()
    }

    /// Remove the head if it is still `id`. Returns whether it was removed.
    ///
    /// Check and removal happen under one lock and skip eviction, so an
    /// entry upserted after the caller's `peek` is left in place.
    pub fn remove_head_if(&self, id: u32) -> bool {
        let mut queue = self.queue.lock();
        if queue.entries.front().is_some_and(|e| e.id == id) {
            queue.entries.pop_front();
            true
        } else {
            false
        }
    }

    /// Current queue contents without applying eviction.
    pub fn snapshot(&self) -> Vec<NotificationEntry> {
        self.queue.lock().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().entries.is_empty()
    }

    /// Resolves once an upsert has happened since the previous wait.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }

    fn evict(&self, entries: &mut VecDeque<NotificationEntry>) {
        match self.config.mode {
            QueueMode::Queue => {
                while entries.len() > 1 && entries.front().is_some_and(|e| e.is_sticky()) {
                    if let Some(dropped) = entries.pop_front() {
                        debug!(id = dropped.id, "skipping sticky notification");
                    }
                }
            }
            QueueMode::LatestOnly => {
                let excess = entries.len().saturating_sub(1);
                if excess > 0 {
                    debug!(dropped = excess, "collapsing to latest notification");
                    entries.drain(..excess);
                }
            }
        }
    }
}

/// Keep at most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
