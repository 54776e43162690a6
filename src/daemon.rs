//! Notification daemon: D-Bus server + display scheduler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use statnot_core::{DisplayScheduler, NotificationRegistry, StatusSource};
use tracing::info;

use crate::config::Config;
use crate::display;
use crate::notify::dbus::{NotificationServer, BUS_NAME, OBJECT_PATH};
use crate::notify::NotifyAdapter;
use crate::status::CommandStatusSource;

/// Build the scheduler described by `config`, reading from `registry`.
pub fn build_scheduler(config: &Config, registry: Arc<NotificationRegistry>) -> DisplayScheduler {
    let status: Option<Arc<dyn StatusSource>> = config.use_status_text.then(|| {
        Arc::new(CommandStatusSource::new(
            config.status_argv(),
            config.status_timeout(),
        )) as Arc<dyn StatusSource>
    });
    DisplayScheduler::new(
        config.scheduler_config(),
        registry,
        status,
        display::from_config(config),
    )
}

/// Run the daemon until Ctrl-C.
///
/// - Claims `org.freedesktop.Notifications` on the session bus
/// - Runs the display scheduler on the current task
/// - Releases the bus name on shutdown
pub async fn run(config: Config) -> Result<()> {
    let registry = Arc::new(NotificationRegistry::new(config.registry_config()));
    let adapter = Arc::new(NotifyAdapter::new(Arc::clone(&registry), &config));

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    let conn = zbus::connection::Builder::session()?
        .name(BUS_NAME)?
        .serve_at(OBJECT_PATH, NotificationServer::new(adapter))?
        .build()
        .await
        .with_context(|| {
            format!("claim {BUS_NAME} (is another notification daemon running?)")
        })?;

    info!("D-Bus: {BUS_NAME} on session bus");
    info!(
        queue = config.queue_notifications,
        status_text = config.use_status_text,
        display = ?config.display.kind,
        "ready, Ctrl+C to stop"
    );

    let mut scheduler = build_scheduler(&config, registry);
    scheduler.run(&running).await;

    info!("releasing {BUS_NAME}");
    drop(conn);
    Ok(())
}
