//! Admin and dermatologist dashboard models
//!
//! All statistics are aggregated server-side; these are display envelopes.

use serde::Deserialize;

use super::ProductData;

/// Platform-wide statistics for the admin dashboard
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_dermatologists: u64,
    pub total_products: u64,
    pub total_appointments: u64,
    #[serde(default)]
    pub pending_approvals: u64,
}

/// Per-dermatologist statistics
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DermatologistStats {
    pub total_patients: u64,
    pub upcoming_appointments: u64,
    pub unread_messages: u64,
}

/// Recent activity entry on the dermatologist dashboard
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DermatologistActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub created_at: String,
}

/// AI recommendation response; degrades to empty on service failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRecommendation {
    #[serde(default)]
    pub ai_recommendations: String,
    #[serde(default)]
    pub matching_products: Vec<ProductData>,
}
