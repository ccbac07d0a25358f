//! Product catalog models

use serde::Deserialize;

/// Product entity
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub ingredients: String,
    pub sustainability_score: f64,
    pub allergens: Option<String>,
    pub image_url: Option<String>,
}
