//! Admin endpoints (/api/admin)

use anyhow::Result;
use serde::Deserialize;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{AdminStats, Role, UserData};

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    stats: AdminStats,
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    users: Vec<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserData,
}

/// A dermatologist account awaiting approval.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDermatologist {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
struct PendingEnvelope {
    dermatologists: Vec<PendingDermatologist>,
}

/// GET /api/admin/stats
pub async fn stats_data(client: &ApiClient) -> Result<AdminStats, ApiError> {
    let resp = client.get("/api/admin/stats").await?;
    let body: StatsEnvelope = client.decode(resp, "/api/admin/stats").await?;
    Ok(body.stats)
}

/// GET /api/admin/users
pub async fn list_users_data(client: &ApiClient) -> Result<Vec<UserData>, ApiError> {
    let resp = client.get("/api/admin/users").await?;
    let body: UsersEnvelope = client.decode(resp, "/api/admin/users").await?;
    Ok(body.users)
}

/// DELETE /api/admin/users/:id
pub async fn delete_user(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/api/admin/users/{}", id)).await?;
    println!("Deleted user {}", id);
    Ok(())
}

/// PATCH /api/admin/users/:id/role
pub async fn update_user_role(client: &ApiClient, id: &str, role: Role) -> Result<UserData> {
    let path = format!("/api/admin/users/{}/role", id);
    let body = serde_json::json!({ "role": role });
    let resp = client.patch_json(&path, &body).await?;
    let body: UserEnvelope = client.decode(resp, &path).await?;
    println!("{} is now {}", body.user.name, body.user.role);
    Ok(body.user)
}

/// GET /api/admin/pending-dermatologists
pub async fn pending_dermatologists_data(
    client: &ApiClient,
) -> Result<Vec<PendingDermatologist>, ApiError> {
    let resp = client.get("/api/admin/pending-dermatologists").await?;
    let body: PendingEnvelope = client
        .decode(resp, "/api/admin/pending-dermatologists")
        .await?;
    Ok(body.dermatologists)
}

/// PATCH /api/admin/dermatologists/:id/approve
pub async fn approve_dermatologist(client: &ApiClient, id: &str, status: &str) -> Result<()> {
    let path = format!("/api/admin/dermatologists/{}/approve", id);
    let body = serde_json::json!({ "status": status });
    client.patch_json(&path, &body).await?;
    println!("Dermatologist {} marked {}", id, status);
    Ok(())
}

/// Show platform statistics.
pub async fn stats(client: &ApiClient) -> Result<()> {
    let stats = stats_data(client).await?;

    println!();
    println!("Users:           {}", stats.total_users);
    println!("Dermatologists:  {}", stats.total_dermatologists);
    println!("Products:        {}", stats.total_products);
    println!("Appointments:    {}", stats.total_appointments);
    println!("Pending derms:   {}", stats.pending_approvals);
    Ok(())
}

/// List all user accounts.
pub async fn list_users(client: &ApiClient) -> Result<()> {
    let users = list_users_data(client).await?;

    println!("\nUsers:");
    println!("{:-<60}", "");
    for user in &users {
        println!("{} <{}> [{}]", user.name, user.email, user.role);
        println!("  ID: {}", user.id);
    }
    Ok(())
}

/// List dermatologist accounts awaiting approval.
pub async fn pending_dermatologists(client: &ApiClient) -> Result<()> {
    let pending = pending_dermatologists_data(client).await?;

    if pending.is_empty() {
        println!("(no pending dermatologists)");
        return Ok(());
    }

    println!("\nPending dermatologists:");
    println!("{:-<60}", "");
    for derm in &pending {
        println!("{} <{}> (applied {})", derm.name, derm.email, derm.created_at);
        println!("  ID: {}", derm.id);
    }
    Ok(())
}
