//! Display scheduler: decides what the status bar shows and when.
//!
//! Every tick peeks the registry, expires the active notification once its
//! timeout has elapsed, and pushes a new line whenever the notification text
//! changed or the periodic status refresh is due.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::registry::NotificationRegistry;
use crate::sink::{DisplaySink, StatusSource};

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Granularity of the control loop.
    pub poll_interval: Duration,
    /// Force a refresh at least this often, notification or not.
    pub status_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            status_interval: Duration::from_secs(2),
        }
    }
}

/// What the scheduler last pushed and when.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    /// Notification text currently shown (empty when none).
    pub displayed: String,
    /// When `displayed` last changed; the active notification's clock.
    pub last_change: Option<Instant>,
    /// When the line was last pushed for any reason.
    pub last_refresh: Option<Instant>,
}

fn elapsed_at_least(since: Option<Instant>, now: Instant, span: Duration) -> bool {
    match since {
        Some(t) => now.saturating_duration_since(t) >= span,
        None => true,
    }
}

pub struct DisplayScheduler {
    config: SchedulerConfig,
    registry: Arc<NotificationRegistry>,
    status: Option<Arc<dyn StatusSource>>,
    display: Box<dyn DisplaySink>,
    state: DisplayState,
}

impl DisplayScheduler {
    /// Create a scheduler. Passing a status source enables status augmentation.
    pub fn new(
        config: SchedulerConfig,
        registry: Arc<NotificationRegistry>,
        status: Option<Arc<dyn StatusSource>>,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        Self {
            config,
            registry,
            status,
            display,
            state: DisplayState::default(),
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Apply the timing rules at `now`.
    ///
    /// Returns the notification text to display when a refresh is due, and
    /// updates the scheduler state accordingly.
    pub fn evaluate(&mut self, now: Instant) -> Option<String> {
        let mut head = self.registry.peek();
        let mut refresh = false;
        let mut expired = None;

        if let Some(entry) = &head {
            if entry.text != self.state.displayed {
                refresh = true;
            } else if !entry.is_sticky()
                && elapsed_at_least(self.state.last_change, now, entry.timeout)
            {
                expired = Some(entry.id);
            }
        }

        // The head may have been replaced since the peek; only drop the one
        // that actually timed out.
        if let Some(id) = expired {
            if self.registry.remove_head_if(id) {
                debug!(id, "notification expired");
            }
            head = self.registry.peek();
            refresh = true;
        }

        if elapsed_at_least(self.state.last_refresh, now, self.config.status_interval) {
            refresh = true;
        }

        if !refresh {
            return None;
        }

        let text = head.map(|e| e.text).unwrap_or_default();
        if expired.is_some() || text != self.state.displayed {
            self.state.last_change = Some(now);
        }
        self.state.displayed = text;
        self.state.last_refresh = Some(now);
        Some(self.state.displayed.clone())
    }

    /// Turn notification text into the line to push.
    ///
    /// `None` means there is nothing to show and the push is skipped.
    pub async fn compose(&self, text: &str) -> Option<String> {
        let Some(status) = &self.status else {
            return (!text.is_empty()).then(|| text.to_string());
        };

        let notification = (!text.is_empty()).then_some(text);
        match status.status(notification).await {
            Ok(line) if !line.is_empty() => Some(line),
            Ok(_) => Some(text.to_string()),
            Err(e) => {
                warn!("status text unavailable, showing notification only: {e}");
                Some(text.to_string())
            }
        }
    }

    /// Run one iteration of the control loop at `now`.
    pub async fn tick(&mut self, now: Instant) {
        let Some(text) = self.evaluate(now) else {
            return;
        };
        let Some(line) = self.compose(&text).await else {
            return;
        };
        if let Err(e) = self.display.show(&line).await {
            warn!("failed to update display: {e}");
        }
    }

    /// Loop until `running` is cleared.
    ///
    /// Wakes every poll interval, and early when a notification arrives.
    pub async fn run(&mut self, running: &AtomicBool) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let registry = Arc::clone(&self.registry);

        info!(
            poll_ms = self.config.poll_interval.as_millis() as u64,
            status_interval_ms = self.config.status_interval.as_millis() as u64,
            augmented = self.status.is_some(),
            "display scheduler started"
        );

        while running.load(Ordering::SeqCst) {
            self.tick(Instant::now()).await;

            tokio::select! {
                _ = interval.tick() => {}
                _ = registry.changed() => {}
            }
        }

        info!("display scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{QueueMode, RegistryConfig};

    struct NullDisplay;

    #[async_trait::async_trait]
    impl DisplaySink for NullDisplay {
        async fn show(&self, _line: &str) -> Result<(), crate::DisplayError> {
            Ok(())
        }
    }

    fn scheduler(mode: QueueMode) -> (Arc<NotificationRegistry>, DisplayScheduler) {
        let registry = Arc::new(NotificationRegistry::new(RegistryConfig {
            max_length: 100,
            mode,
        }));
        let scheduler = DisplayScheduler::new(
            SchedulerConfig {
                poll_interval: Duration::from_millis(100),
                status_interval: Duration::from_secs(2),
            },
            Arc::clone(&registry),
            None,
            Box::new(NullDisplay),
        );
        (registry, scheduler)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_first_tick_refreshes_empty() {
        let (_reg, mut sched) = scheduler(QueueMode::Queue);
        let t0 = Instant::now();
        assert_eq!(sched.evaluate(t0), Some(String::new()));
        assert_eq!(sched.evaluate(t0 + ms(100)), None);
    }

    #[test]
    fn test_new_head_refreshes_immediately() {
        let (reg, mut sched) = scheduler(QueueMode::Queue);
        let t0 = Instant::now();
        sched.evaluate(t0);

        reg.upsert(None, "mail", Duration::from_secs(3));
        assert_eq!(sched.evaluate(t0 + ms(100)), Some("mail".into()));
        assert_eq!(sched.state().last_change, Some(t0 + ms(100)));
    }

    #[test]
    fn test_expiry_pops_and_forces_refresh() {
        let (reg, mut sched) = scheduler(QueueMode::Queue);
        let t0 = Instant::now();
        reg.upsert(None, "first", Duration::from_secs(1));
        reg.upsert(None, "second", Duration::from_secs(1));

        assert_eq!(sched.evaluate(t0), Some("first".into()));
        assert_eq!(sched.evaluate(t0 + ms(900)), None);
        assert_eq!(sched.evaluate(t0 + ms(1000)), Some("second".into()));
        assert_eq!(reg.len(), 1);
        assert_eq!(sched.evaluate(t0 + ms(2000)), Some(String::new()));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_expiry_restarts_clock_for_identical_text() {
        let (reg, mut sched) = scheduler(QueueMode::Queue);
        let t0 = Instant::now();
        reg.upsert(None, "same", Duration::from_secs(1));
        reg.upsert(None, "same", Duration::from_secs(1));

        assert_eq!(sched.evaluate(t0), Some("same".into()));
        assert_eq!(sched.evaluate(t0 + ms(1000)), Some("same".into()));
        assert_eq!(sched.state().last_change, Some(t0 + ms(1000)));
        // The second entry gets its own full second.
        assert_eq!(sched.evaluate(t0 + ms(1500)), None);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_periodic_refresh_without_change() {
        let (_reg, mut sched) = scheduler(QueueMode::Queue);
        let t0 = Instant::now();
        sched.evaluate(t0);
        assert_eq!(sched.evaluate(t0 + ms(1900)), None);
        assert_eq!(sched.evaluate(t0 + ms(2000)), Some(String::new()));
        assert_eq!(sched.state().last_refresh, Some(t0 + ms(2000)));
    }

    #[test]
    fn test_same_text_upsert_keeps_clock() {
        let (reg, mut sched) = scheduler(QueueMode::Queue);
        let t0 = Instant::now();
        let id = reg.upsert(None, "build running", Duration::from_secs(2));
        sched.evaluate(t0);

        reg.upsert(Some(id), "build running", Duration::from_secs(2));
        assert_eq!(sched.evaluate(t0 + ms(1000)), None);
        assert_eq!(sched.evaluate(t0 + ms(2000)), Some(String::new()));
    }

    #[test]
    fn test_changed_text_upsert_restarts_clock() {
        let (reg, mut sched) = scheduler(QueueMode::Queue);
        let t0 = Instant::now();
        let id = reg.upsert(None, "50%", Duration::from_secs(2));
        sched.evaluate(t0);

        reg.upsert(Some(id), "75%", Duration::from_secs(2));
        assert_eq!(sched.evaluate(t0 + ms(1500)), Some("75%".into()));
        assert_eq!(sched.evaluate(t0 + ms(3000)), None);
        assert_eq!(sched.evaluate(t0 + ms(3500)), Some(String::new()));
    }

    #[test]
    fn test_sticky_survives_periodic_refresh() {
        let (reg, mut sched) = scheduler(QueueMode::Queue);
        let t0 = Instant::now();
        reg.upsert(None, "pinned", Duration::ZERO);

        assert_eq!(sched.evaluate(t0), Some("pinned".into()));
        for n in 1..=5 {
            let now = t0 + Duration::from_secs(2 * n);
            assert_eq!(sched.evaluate(now), Some("pinned".into()));
        }
        assert_eq!(reg.len(), 1);
    }

    #[tokio::test]
    async fn test_compose_without_status_suppresses_empty() {
        let (_reg, sched) = scheduler(QueueMode::Queue);
        assert_eq!(sched.compose("").await, None);
        assert_eq!(sched.compose("hi").await, Some("hi".into()));
    }
}
