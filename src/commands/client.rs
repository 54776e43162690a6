//! Client commands: post and inspect notifications via D-Bus.

use std::collections::HashMap;

use statnot::notify::dbus::{BUS_NAME, OBJECT_PATH};
use zbus::zvariant::Value;

use super::CommandResult;

/// Helper to create a D-Bus proxy for whichever notification daemon owns the name.
async fn notifications_proxy() -> anyhow::Result<zbus::Proxy<'static>> {
    let conn = zbus::Connection::session().await?;
    let proxy = zbus::Proxy::new_owned(conn, BUS_NAME, OBJECT_PATH, BUS_NAME).await?;
    Ok(proxy)
}

/// Post a notification. Prints the id the daemon assigned.
pub async fn send(
    app: &str,
    summary: &str,
    body: &str,
    replaces_id: u32,
    timeout_ms: i32,
) -> CommandResult {
    let proxy = notifications_proxy().await?;

    let actions: Vec<&str> = Vec::new();
    let hints: HashMap<&str, Value<'_>> = HashMap::new();
    let reply = proxy
        .call_method(
            "Notify",
            &(app, replaces_id, "", summary, body, actions, hints, timeout_ms),
        )
        .await?;
    let id: u32 = reply.body().deserialize()?;

    println!("{id}");
    Ok(())
}

/// Ask the daemon to close a notification.
pub async fn close(id: u32) -> CommandResult {
    let proxy = notifications_proxy().await?;
    proxy.call_method("CloseNotification", &(id,)).await?;
    println!("Close requested for notification {id}.");
    Ok(())
}

/// Print server information and capabilities.
pub async fn info() -> CommandResult {
    let proxy = notifications_proxy().await?;

    let reply = proxy.call_method("GetServerInformation", &()).await?;
    let (name, vendor, version, spec): (String, String, String, String) =
        reply.body().deserialize()?;

    let reply = proxy.call_method("GetCapabilities", &()).await?;
    let caps: Vec<String> = reply.body().deserialize()?;

    println!("{:<14} {name}", "Server:");
    println!("{:<14} {vendor}", "Vendor:");
    println!("{:<14} {version}", "Version:");
    println!("{:<14} {spec}", "Spec version:");
    println!("{:<14} {}", "Capabilities:", caps.join(", "));
    Ok(())
}
