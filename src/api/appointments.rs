//! Appointment endpoints (/api/appointments)

use anyhow::Result;
use serde::Deserialize;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::AppointmentData;

#[derive(Debug, Deserialize)]
struct AppointmentsEnvelope {
    appointments: Vec<AppointmentData>,
}

#[derive(Debug, Deserialize)]
struct AppointmentEnvelope {
    appointment: AppointmentData,
}

/// GET /api/appointments
pub async fn list_appointments_data(
    client: &ApiClient,
) -> Result<Vec<AppointmentData>, ApiError> {
    let resp = client.get("/api/appointments").await?;
    let body: AppointmentsEnvelope = client.decode(resp, "/api/appointments").await?;
    Ok(body.appointments)
}

/// POST /api/appointments
pub async fn create_appointment(
    client: &ApiClient,
    dermatologist_id: &str,
    date: &str,
    notes: Option<&str>,
) -> Result<AppointmentData> {
    let mut body = serde_json::json!({
        "dermatologistId": dermatologist_id,
        "date": date,
    });
    if let Some(notes) = notes {
        body["notes"] = notes.into();
    }

    let resp = client.post_json("/api/appointments", &body).await?;
    let body: AppointmentEnvelope = client.decode(resp, "/api/appointments").await?;
    println!(
        "Booked appointment {} on {}",
        body.appointment.id, body.appointment.date
    );
    Ok(body.appointment)
}

/// PATCH /api/appointments/:id/status
pub async fn update_status(
    client: &ApiClient,
    id: &str,
    status: &str,
) -> Result<AppointmentData> {
    let path = format!("/api/appointments/{}/status", id);
    let body = serde_json::json!({ "status": status });
    let resp = client.patch_json(&path, &body).await?;
    let body: AppointmentEnvelope = client.decode(resp, &path).await?;
    println!("Appointment {} is now {}", id, body.appointment.status);
    Ok(body.appointment)
}

/// DELETE /api/appointments/:id
pub async fn delete_appointment(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/api/appointments/{}", id)).await?;
    println!("Cancelled appointment {}", id);
    Ok(())
}

/// List appointments for the current user.
pub async fn list_appointments(client: &ApiClient) -> Result<()> {
    let appointments = list_appointments_data(client).await?;

    if appointments.is_empty() {
        println!("(no appointments)");
        return Ok(());
    }

    println!("\nAppointments:");
    println!("{:-<60}", "");
    for appt in &appointments {
        println!("[{}] {} — {}", appt.date, appt.id, appt.status);
        println!("  Dermatologist: {}", appt.dermatologist_id);
        if let Some(ref notes) = appt.notes {
            if !notes.is_empty() {
                println!("  {}", notes);
            }
        }
    }
    Ok(())
}
