//! Progress tracking models

use serde::Deserialize;

use super::SkinConcern;

/// One progress log entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLogData {
    pub id: String,
    pub user_id: String,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub concerns: SkinConcern,
    pub rating: u8,
    pub created_at: String,
}

/// Before/after comparison between two log entries
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressComparisonData {
    pub before: ProgressLogData,
    pub after: ProgressLogData,
    pub improvement_percentage: f64,
}
