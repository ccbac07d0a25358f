//! Progress tracking endpoints (/api/progress)

use anyhow::{bail, Result};
use reqwest::multipart::Form;
use serde::Deserialize;
use std::path::PathBuf;

use super::client::ApiClient;
use super::error::ApiError;
use super::users::file_part;
use crate::models::{ProgressComparisonData, ProgressLogData, SkinConcern};

#[derive(Debug, Deserialize)]
struct LogsEnvelope {
    logs: Vec<ProgressLogData>,
}

/// POST /api/progress responds with an explicit success envelope.
#[derive(Debug, Deserialize)]
struct CreateLogEnvelope {
    success: bool,
    #[serde(default)]
    message: String,
    log: Option<ProgressLogData>,
}

/// New progress log entry; every field is enumerated explicitly.
#[derive(Debug)]
pub struct NewProgressLog {
    pub image: Option<PathBuf>,
    pub notes: Option<String>,
    pub concern: SkinConcern,
    pub rating: u8,
}

impl NewProgressLog {
    async fn into_form(self) -> Result<Form> {
        let concern = serde_json::to_value(self.concern).expect("serializable");
        let mut form = Form::new()
            .text("concerns", concern.as_str().expect("string enum").to_string())
            .text("rating", self.rating.to_string());
        if let Some(notes) = self.notes {
            form = form.text("notes", notes);
        }
        if let Some(image) = self.image {
            form = form.part("image", file_part(&image).await?);
        }
        Ok(form)
    }
}

/// GET /api/progress
pub async fn list_logs_data(client: &ApiClient) -> Result<Vec<ProgressLogData>, ApiError> {
    let resp = client.get("/api/progress").await?;
    let body: LogsEnvelope = client.decode(resp, "/api/progress").await?;
    Ok(body.logs)
}

/// POST /api/progress (multipart, supports photo upload)
pub async fn create_log(client: &ApiClient, log: NewProgressLog) -> Result<ProgressLogData> {
    let form = log.into_form().await?;
    let resp = client.post_multipart("/api/progress", form).await?;
    let body: CreateLogEnvelope = client.decode(resp, "/api/progress").await?;

    if !body.success {
        bail!("Failed to create progress log: {}", body.message);
    }
    let Some(log) = body.log else {
        bail!("Malformed progress response: missing log");
    };

    println!("Logged progress entry {}", log.id);
    Ok(log)
}

/// DELETE /api/progress/:id
pub async fn delete_log(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/api/progress/{}", id)).await?;
    println!("Deleted progress log {}", id);
    Ok(())
}

/// GET /api/progress/comparison?fromDate&toDate
pub async fn comparison_data(
    client: &ApiClient,
    from_date: &str,
    to_date: &str,
) -> Result<ProgressComparisonData, ApiError> {
    let query = [
        ("fromDate", from_date.to_string()),
        ("toDate", to_date.to_string()),
    ];
    let resp = client.get_query("/api/progress/comparison", &query).await?;
    client.decode(resp, "/api/progress/comparison").await
}

/// List progress log entries.
pub async fn list_logs(client: &ApiClient) -> Result<()> {
    let logs = list_logs_data(client).await?;

    if logs.is_empty() {
        println!("(no progress logs yet)");
        return Ok(());
    }

    println!("\nProgress log:");
    println!("{:-<60}", "");
    for log in &logs {
        println!("[{}] {:?} rating {}/5", log.created_at, log.concerns, log.rating);
        println!("  ID: {}", log.id);
        if let Some(ref notes) = log.notes {
            if !notes.is_empty() {
                println!("  {}", notes);
            }
        }
        if let Some(ref url) = log.image_url {
            println!("  Photo: {}", url);
        }
        println!();
    }
    Ok(())
}

/// Show a before/after comparison between two dates.
pub async fn comparison(client: &ApiClient, from_date: &str, to_date: &str) -> Result<()> {
    let cmp = comparison_data(client, from_date, to_date).await?;

    println!();
    println!("Before [{}]: rating {}/5", cmp.before.created_at, cmp.before.rating);
    println!("After  [{}]: rating {}/5", cmp.after.created_at, cmp.after.rating);
    println!("Improvement: {:.0}%", cmp.improvement_percentage);
    Ok(())
}
