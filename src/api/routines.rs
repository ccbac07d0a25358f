//! Routine endpoints (/api/routines)

use anyhow::Result;
use serde::Deserialize;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{RoutineData, RoutineStepData};

#[derive(Debug, Deserialize)]
struct RoutinesEnvelope {
    routines: Vec<RoutineData>,
}

#[derive(Debug, Deserialize)]
struct RoutineEnvelope {
    routine: RoutineData,
}

#[derive(Debug, Deserialize)]
struct StepEnvelope {
    step: RoutineStepData,
}

/// GET /api/routines
pub async fn list_routines_data(client: &ApiClient) -> Result<Vec<RoutineData>, ApiError> {
    let resp = client.get("/api/routines").await?;
    let body: RoutinesEnvelope = client.decode(resp, "/api/routines").await?;
    Ok(body.routines)
}

/// GET /api/routines/:id
pub async fn get_routine_data(client: &ApiClient, id: &str) -> Result<RoutineData, ApiError> {
    let path = format!("/api/routines/{}", id);
    let resp = client.get(&path).await?;
    let body: RoutineEnvelope = client.decode(resp, &path).await?;
    Ok(body.routine)
}

/// POST /api/routines
pub async fn create_routine(
    client: &ApiClient,
    name: &str,
    routine_type: &str,
) -> Result<RoutineData> {
    let body = serde_json::json!({ "name": name, "type": routine_type });
    let resp = client.post_json("/api/routines", &body).await?;
    let body: RoutineEnvelope = client.decode(resp, "/api/routines").await?;
    println!("Created routine {} ({})", body.routine.name, body.routine.id);
    Ok(body.routine)
}

/// PUT /api/routines/:id: partial update, only provided fields are sent.
pub async fn update_routine(
    client: &ApiClient,
    id: &str,
    name: Option<&str>,
    routine_type: Option<&str>,
) -> Result<RoutineData> {
    let mut body = serde_json::Map::new();
    if let Some(name) = name {
        body.insert("name".into(), name.into());
    }
    if let Some(routine_type) = routine_type {
        body.insert("type".into(), routine_type.into());
    }

    let path = format!("/api/routines/{}", id);
    let resp = client.put_json(&path, &serde_json::Value::Object(body)).await?;
    let body: RoutineEnvelope = client.decode(resp, &path).await?;
    println!("Updated routine {}", body.routine.name);
    Ok(body.routine)
}

/// DELETE /api/routines/:id
pub async fn delete_routine(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/api/routines/{}", id)).await?;
    println!("Deleted routine {}", id);
    Ok(())
}

/// POST /api/routines/steps
pub async fn add_step(
    client: &ApiClient,
    routine_id: &str,
    product_id: &str,
    step_order: u32,
    notes: Option<&str>,
) -> Result<RoutineStepData> {
    let mut body = serde_json::json!({
        "routineId": routine_id,
        "productId": product_id,
        "stepOrder": step_order,
    });
    if let Some(notes) = notes {
        body["notes"] = notes.into();
    }

    let resp = client.post_json("/api/routines/steps", &body).await?;
    let body: StepEnvelope = client.decode(resp, "/api/routines/steps").await?;
    println!("Added step {} to routine {}", body.step.step_order, routine_id);
    Ok(body.step)
}

/// DELETE /api/routines/steps/:id
pub async fn delete_step(client: &ApiClient, step_id: &str) -> Result<()> {
    client
        .delete(&format!("/api/routines/steps/{}", step_id))
        .await?;
    println!("Deleted step {}", step_id);
    Ok(())
}

fn print_routine(routine: &RoutineData) {
    println!("{} [{}]", routine.name, routine.routine_type);
    println!("  ID: {}", routine.id);
    for step in &routine.steps {
        let product = step
            .product
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(step.product_id.as_str());
        match step.notes.as_deref() {
            Some(notes) if !notes.is_empty() => {
                println!("  {}. {} — {} (step {})", step.step_order, product, notes, step.id)
            }
            _ => println!("  {}. {} (step {})", step.step_order, product, step.id),
        }
    }
}

/// List the current user's routines with their steps.
pub async fn list_routines(client: &ApiClient) -> Result<()> {
    let routines = list_routines_data(client).await?;

    if routines.is_empty() {
        println!("(no routines yet)");
        return Ok(());
    }

    println!("\nRoutines:");
    println!("{:-<60}", "");
    for routine in &routines {
        print_routine(routine);
        println!();
    }
    Ok(())
}

/// Show one routine.
pub async fn show_routine(client: &ApiClient, id: &str) -> Result<()> {
    let routine = get_routine_data(client, id).await?;
    println!();
    print_routine(&routine);
    Ok(())
}
