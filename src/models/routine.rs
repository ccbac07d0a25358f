//! Routine models

use serde::Deserialize;

use super::ProductData;

/// Skincare routine with ordered steps
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineData {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub routine_type: String,
    #[serde(default)]
    pub steps: Vec<RoutineStepData>,
}

/// One step of a routine, referencing a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineStepData {
    pub id: String,
    pub routine_id: String,
    pub product_id: String,
    pub product: Option<ProductData>,
    pub step_order: u32,
    pub notes: Option<String>,
}
