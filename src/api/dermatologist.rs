//! Dermatologist workspace endpoints
//!
//! Path literals keep the backend's route spelling.

use anyhow::Result;
use serde::Deserialize;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{DermatologistActivity, DermatologistStats, Patient};

#[derive(Debug, Deserialize)]
struct PatientsEnvelope {
    patients: Vec<Patient>,
}

#[derive(Debug, Deserialize)]
struct PatientEnvelope {
    patient: Patient,
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    stats: DermatologistStats,
}

#[derive(Debug, Deserialize)]
struct ActivitiesEnvelope {
    activities: Vec<DermatologistActivity>,
}

/// GET /api/dermotologist/patients
pub async fn patients_data(client: &ApiClient) -> Result<Vec<Patient>, ApiError> {
    let resp = client.get("/api/dermotologist/patients").await?;
    let body: PatientsEnvelope = client.decode(resp, "/api/dermotologist/patients").await?;
    Ok(body.patients)
}

/// GET /api/dermotologist/patients/:id
pub async fn patient_data(client: &ApiClient, id: &str) -> Result<Patient, ApiError> {
    let path = format!("/api/dermotologist/patients/{}", id);
    let resp = client.get(&path).await?;
    let body: PatientEnvelope = client.decode(resp, &path).await?;
    Ok(body.patient)
}

/// GET /api/dermotologist/stats
pub async fn stats_data(client: &ApiClient) -> Result<DermatologistStats, ApiError> {
    let resp = client.get("/api/dermotologist/stats").await?;
    let body: StatsEnvelope = client.decode(resp, "/api/dermotologist/stats").await?;
    Ok(body.stats)
}

/// GET /api/dermotologist/activity
pub async fn activity_data(
    client: &ApiClient,
) -> Result<Vec<DermatologistActivity>, ApiError> {
    let resp = client.get("/api/dermotologist/activity").await?;
    let body: ActivitiesEnvelope = client.decode(resp, "/api/dermotologist/activity").await?;
    Ok(body.activities)
}

/// List the dermatologist's patients.
pub async fn list_patients(client: &ApiClient) -> Result<()> {
    let patients = patients_data(client).await?;

    if patients.is_empty() {
        println!("(no patients yet)");
        return Ok(());
    }

    println!("\nPatients:");
    println!("{:-<60}", "");
    for p in &patients {
        println!("{} <{}>", p.name, p.email);
        println!("  ID: {}", p.id);
        if let Some(ref visit) = p.last_visit {
            println!("  Last visit: {}", visit);
        }
    }
    Ok(())
}

/// Show one patient in detail.
pub async fn show_patient(client: &ApiClient, id: &str) -> Result<()> {
    let p = patient_data(client, id).await?;

    println!();
    println!("Name:      {}", p.name);
    println!("Email:     {}", p.email);
    println!("ID:        {}", p.id);
    if let Some(ref st) = p.skin_type {
        println!("Skin type: {}", st);
    }
    if let Some(ref visit) = p.last_visit {
        println!("Last visit: {}", visit);
    }
    if let Some(ref image) = p.image {
        println!("Photo:     {}", image);
    }
    Ok(())
}

/// Show the dermatologist dashboard summary.
pub async fn dashboard(client: &ApiClient) -> Result<()> {
    let stats = stats_data(client).await?;

    println!();
    println!("Patients:              {}", stats.total_patients);
    println!("Upcoming appointments: {}", stats.upcoming_appointments);
    println!("Unread messages:       {}", stats.unread_messages);

    let activities = activity_data(client).await?;
    if !activities.is_empty() {
        println!("\nRecent activity:");
        for a in &activities {
            println!("[{}] {}: {}", a.created_at, a.kind, a.description);
        }
    }
    Ok(())
}
