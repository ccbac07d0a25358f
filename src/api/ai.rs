//! AI recommendation endpoint (/api/ai)

use anyhow::Result;

use super::client::ApiClient;
use crate::models::AiRecommendation;

/// GET /api/ai/recommendations.
///
/// The one service that swallows failures: a degraded or unavailable AI
/// backend yields an empty recommendation instead of an error.
pub async fn recommendations_data(client: &ApiClient) -> AiRecommendation {
    let result = async {
        let resp = client.get("/api/ai/recommendations").await?;
        client
            .decode::<AiRecommendation>(resp, "/api/ai/recommendations")
            .await
    }
    .await;

    match result {
        Ok(rec) => rec,
        Err(e) => {
            tracing::warn!("AI recommendations unavailable: {:#}", e);
            AiRecommendation::default()
        }
    }
}

/// Print AI-generated recommendations with matching products.
pub async fn recommendations(client: &ApiClient) -> Result<()> {
    let rec = recommendations_data(client).await;

    if rec.ai_recommendations.is_empty() && rec.matching_products.is_empty() {
        println!("(no recommendations available right now)");
        return Ok(());
    }

    if !rec.ai_recommendations.is_empty() {
        println!();
        println!("{}", rec.ai_recommendations);
    }

    if !rec.matching_products.is_empty() {
        println!("\nMatching products:");
        println!("{:-<60}", "");
        for p in &rec.matching_products {
            println!("{} — {}", p.name, p.brand);
            println!("  ID: {}", p.id);
        }
    }
    Ok(())
}
