//! Notification models

use serde::Deserialize;

/// In-app notification
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationData {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}
