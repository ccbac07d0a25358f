//! Product catalog endpoints (/api/products)

use anyhow::Result;
use reqwest::multipart::Form;
use std::path::PathBuf;

use super::client::ApiClient;
use super::error::ApiError;
use super::users::file_part;
use crate::models::ProductData;

/// Catalog query parameters.
#[derive(Debug, Default)]
pub struct ProductQuery {
    pub skin_type: Option<String>,
    pub concerns: Vec<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref st) = self.skin_type {
            query.push(("skinType", st.clone()));
        }
        for concern in &self.concerns {
            query.push(("concerns", concern.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

/// New or updated product; every field is enumerated explicitly.
#[derive(Debug)]
pub struct ProductUpsert {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub ingredients: String,
    pub sustainability_score: f64,
    pub allergens: Option<String>,
    pub image: Option<PathBuf>,
}

impl ProductUpsert {
    async fn into_form(self) -> Result<Form> {
        let mut form = Form::new()
            .text("name", self.name)
            .text("brand", self.brand)
            .text("description", self.description)
            .text("ingredients", self.ingredients)
            .text("sustainabilityScore", self.sustainability_score.to_string());
        if let Some(allergens) = self.allergens {
            form = form.text("allergens", allergens);
        }
        if let Some(image) = self.image {
            form = form.part("image", file_part(&image).await?);
        }
        Ok(form)
    }
}

/// GET /api/products
pub async fn list_products_data(
    client: &ApiClient,
    query: &ProductQuery,
) -> Result<Vec<ProductData>, ApiError> {
    let resp = client.get_query("/api/products", &query.to_query()).await?;
    client.decode(resp, "/api/products").await
}

/// GET /api/products/:id
pub async fn get_product_data(client: &ApiClient, id: &str) -> Result<ProductData, ApiError> {
    let path = format!("/api/products/{}", id);
    let resp = client.get(&path).await?;
    client.decode(resp, &path).await
}

/// GET /api/products/recommended
pub async fn recommended_products_data(client: &ApiClient) -> Result<Vec<ProductData>, ApiError> {
    let resp = client.get("/api/products/recommended").await?;
    client.decode(resp, "/api/products/recommended").await
}

/// POST /api/products (multipart, admin only)
pub async fn create_product(client: &ApiClient, product: ProductUpsert) -> Result<ProductData> {
    let form = product.into_form().await?;
    let resp = client.post_multipart("/api/products", form).await?;
    let created: ProductData = client.decode(resp, "/api/products").await?;
    println!("Created product {} ({})", created.name, created.id);
    Ok(created)
}

/// PUT /api/products/:id (multipart, admin only)
pub async fn update_product(
    client: &ApiClient,
    id: &str,
    product: ProductUpsert,
) -> Result<ProductData> {
    let path = format!("/api/products/{}", id);
    let form = product.into_form().await?;
    let resp = client.put_multipart(&path, form).await?;
    let updated: ProductData = client.decode(resp, &path).await?;
    println!("Updated product {}", updated.name);
    Ok(updated)
}

/// DELETE /api/products/:id (admin only)
pub async fn delete_product(client: &ApiClient, id: &str) -> Result<()> {
    client.delete(&format!("/api/products/{}", id)).await?;
    println!("Deleted product {}", id);
    Ok(())
}

fn print_product_line(p: &ProductData) {
    println!("{} — {}", p.name, p.brand);
    println!("  ID: {}", p.id);
    println!("  Sustainability: {:.1}", p.sustainability_score);
    if let Some(ref allergens) = p.allergens {
        if !allergens.is_empty() {
            println!("  Allergens: {}", allergens);
        }
    }
}

/// List products matching a query.
pub async fn list_products(client: &ApiClient, query: &ProductQuery) -> Result<()> {
    let products = list_products_data(client, query).await?;

    if products.is_empty() {
        println!("(no products found)");
        return Ok(());
    }

    println!("\nProducts:");
    println!("{:-<60}", "");
    for p in &products {
        print_product_line(p);
        println!();
    }
    Ok(())
}

/// Show one product in full.
pub async fn show_product(client: &ApiClient, id: &str) -> Result<()> {
    let p = get_product_data(client, id).await?;

    println!();
    println!("{} — {}", p.name, p.brand);
    println!("{}", p.description);
    println!("Ingredients: {}", p.ingredients);
    println!("Sustainability: {:.1}", p.sustainability_score);
    if let Some(ref allergens) = p.allergens {
        println!("Allergens: {}", allergens);
    }
    if let Some(ref url) = p.image_url {
        println!("Image: {}", url);
    }
    Ok(())
}

/// List products recommended for the current user's skin profile.
pub async fn recommended_products(client: &ApiClient) -> Result<()> {
    let products = recommended_products_data(client).await?;

    if products.is_empty() {
        println!("(no recommendations yet — complete a skin assessment first)");
        return Ok(());
    }

    println!("\nRecommended for you:");
    println!("{:-<60}", "");
    for p in &products {
        print_product_line(p);
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_enumerates_fields_explicitly() {
        let query = ProductQuery {
            skin_type: Some("OILY".into()),
            concerns: vec!["ACNE".into(), "REDNESS".into()],
            page: Some(2),
            limit: None,
        };
        assert_eq!(
            query.to_query(),
            vec![
                ("skinType", "OILY".to_string()),
                ("concerns", "ACNE".to_string()),
                ("concerns", "REDNESS".to_string()),
                ("page", "2".to_string()),
            ]
        );
    }

    #[test]
    fn empty_query_is_empty() {
        assert!(ProductQuery::default().to_query().is_empty());
    }
}
