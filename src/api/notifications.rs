//! Notification endpoints (/api/notifications)

use anyhow::Result;
use serde::Deserialize;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::NotificationData;

#[derive(Debug, Deserialize)]
struct NotificationsEnvelope {
    notifications: Vec<NotificationData>,
}

/// GET /api/notifications
pub async fn list_notifications_data(
    client: &ApiClient,
) -> Result<Vec<NotificationData>, ApiError> {
    let resp = client.get("/api/notifications").await?;
    let body: NotificationsEnvelope = client.decode(resp, "/api/notifications").await?;
    Ok(body.notifications)
}

/// PATCH /api/notifications/:id/read
pub async fn mark_read(client: &ApiClient, id: &str) -> Result<()> {
    client
        .patch_empty(&format!("/api/notifications/{}/read", id))
        .await?;
    println!("Marked {} as read", id);
    Ok(())
}

/// PATCH /api/notifications/read-all
pub async fn mark_all_read(client: &ApiClient) -> Result<()> {
    client.patch_empty("/api/notifications/read-all").await?;
    println!("All notifications marked as read");
    Ok(())
}

/// DELETE /api/notifications/:id
pub async fn delete_notification(client: &ApiClient, id: &str) -> Result<()> {
    client
        .delete(&format!("/api/notifications/{}", id))
        .await?;
    println!("Deleted notification {}", id);
    Ok(())
}

/// List notifications, unread first marker.
pub async fn list_notifications(client: &ApiClient) -> Result<()> {
    let notifications = list_notifications_data(client).await?;

    if notifications.is_empty() {
        println!("(no notifications)");
        return Ok(());
    }

    println!("\nNotifications:");
    println!("{:-<60}", "");
    for n in &notifications {
        let marker = if n.read { " " } else { "*" };
        match n.kind.as_deref() {
            Some(kind) => println!("{} [{}] ({}) {}", marker, n.created_at, kind, n.message),
            None => println!("{} [{}] {}", marker, n.created_at, n.message),
        }
        println!("    ID: {}", n.id);
    }
    Ok(())
}
