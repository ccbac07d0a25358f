//! User profile endpoints (/api/user)

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::UserData;

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserData,
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    users: Vec<UserData>,
}

/// Profile update; every field is enumerated explicitly.
#[derive(Debug, Default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub image: Option<PathBuf>,
}

/// Read a local file into a multipart part, keeping its file name.
pub(crate) async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

impl UpdateProfileRequest {
    async fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        if let Some(name) = self.name {
            form = form.text("name", name);
        }
        if let Some(phone) = self.phone {
            form = form.text("phone", phone);
        }
        if let Some(image) = self.image {
            form = form.part("image", file_part(&image).await?);
        }
        Ok(form)
    }
}

/// PUT /api/user/profile (multipart, supports image upload). The returned
/// profile replaces the cached one.
pub async fn update_profile(
    client: &ApiClient,
    req: UpdateProfileRequest,
) -> Result<UserData> {
    let form = req.into_form().await?;
    let resp = client.put_multipart("/api/user/profile", form).await?;
    let body: UserEnvelope = client.decode(resp, "/api/user/profile").await?;

    client.session().lock().unwrap().set_user(body.user.clone())?;
    println!("Profile updated.");
    Ok(body.user)
}

/// DELETE /api/user/profile: requires the account password; clears the
/// session afterwards.
pub async fn delete_profile(client: &ApiClient, password: &str) -> Result<()> {
    let body = serde_json::json!({ "password": password });
    client.delete_json("/api/user/profile", &body).await?;
    client.session().lock().unwrap().clear()?;
    println!("Account deleted.");
    Ok(())
}

/// GET /api/user/dermotologist: the dermatologist directory.
/// (Path spelling matches the backend route.)
pub async fn list_dermatologists_data(client: &ApiClient) -> Result<Vec<UserData>, ApiError> {
    let resp = client.get("/api/user/dermotologist").await?;
    let body: UsersEnvelope = client.decode(resp, "/api/user/dermotologist").await?;
    Ok(body.users)
}

/// Print the dermatologist directory.
pub async fn list_dermatologists(client: &ApiClient) -> Result<()> {
    let derms = list_dermatologists_data(client).await?;

    if derms.is_empty() {
        println!("(no dermatologists found)");
        return Ok(());
    }

    println!("\nDermatologists:");
    println!("{:-<60}", "");
    for d in &derms {
        println!("{}  <{}>", d.name, d.email);
        println!("  ID: {}", d.id);
    }
    Ok(())
}

/// Fetch and display the current user's profile.
pub async fn whoami(client: &ApiClient) -> Result<()> {
    let me = client.fetch_profile().await?;

    println!();
    println!("Name:  {}", me.name);
    println!("Email: {}", me.email);
    println!("Role:  {}", me.role);
    println!("Phone: {}", me.phone.as_deref().unwrap_or("(none)"));
    println!("ID:    {}", me.id);

    Ok(())
}
