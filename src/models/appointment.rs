//! Appointment models

use serde::Deserialize;

/// Appointment between a patient and a dermatologist
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentData {
    pub id: String,
    pub user_id: String,
    pub dermatologist_id: String,
    pub date: String,
    pub status: String,
    pub notes: Option<String>,
}
