//! Skin profile endpoints (/api/skinProfile)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{SkinConcern, SkinProfileData, SkinType};

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    profile: SkinProfileData,
}

/// Assessment input as collected from the user.
#[derive(Debug)]
pub struct SkinAssessment {
    pub skin_type: SkinType,
    pub concerns: Vec<SkinConcern>,
    pub allergies: Option<String>,
    pub goals: Option<String>,
}

// The backend expects skin type and concerns wrapped in one-field objects.
#[derive(Debug, Serialize)]
struct SkinTypeEntry {
    #[serde(rename = "type")]
    skin_type: SkinType,
}

#[derive(Debug, Serialize)]
struct ConcernEntry {
    concern: SkinConcern,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkinProfilePayload {
    skin_type: Vec<SkinTypeEntry>,
    concerns: Vec<ConcernEntry>,
    allergies: String,
    goals: Option<String>,
}

impl SkinAssessment {
    fn into_payload(self) -> SkinProfilePayload {
        SkinProfilePayload {
            skin_type: vec![SkinTypeEntry {
                skin_type: self.skin_type,
            }],
            concerns: self
                .concerns
                .into_iter()
                .map(|concern| ConcernEntry { concern })
                .collect(),
            allergies: self.allergies.unwrap_or_default(),
            goals: self.goals,
        }
    }
}

/// GET /api/skinProfile
pub async fn get_profile_data(client: &ApiClient) -> Result<SkinProfileData, ApiError> {
    let resp = client.get("/api/skinProfile").await?;
    let body: ProfileEnvelope = client.decode(resp, "/api/skinProfile").await?;
    Ok(body.profile)
}

/// POST /api/skinProfile
pub async fn create_profile(
    client: &ApiClient,
    assessment: SkinAssessment,
) -> Result<SkinProfileData> {
    let body = serde_json::to_value(assessment.into_payload()).expect("serializable");
    let resp = client.post_json("/api/skinProfile", &body).await?;
    let body: ProfileEnvelope = client.decode(resp, "/api/skinProfile").await?;
    println!("Skin profile created.");
    Ok(body.profile)
}

/// PUT /api/skinProfile
pub async fn update_profile(
    client: &ApiClient,
    assessment: SkinAssessment,
) -> Result<SkinProfileData> {
    let body = serde_json::to_value(assessment.into_payload()).expect("serializable");
    let resp = client.put_json("/api/skinProfile", &body).await?;
    let body: ProfileEnvelope = client.decode(resp, "/api/skinProfile").await?;
    println!("Skin profile updated.");
    Ok(body.profile)
}

/// Show the current skin profile.
pub async fn show_profile(client: &ApiClient) -> Result<()> {
    let profile = get_profile_data(client).await?;

    println!();
    println!("Skin type: {:?}", profile.skin_type);
    println!(
        "Concerns:  {}",
        profile
            .concerns
            .iter()
            .map(|c| format!("{:?}", c))
            .collect::<Vec<_>>()
            .join(", ")
    );
    if let Some(ref allergies) = profile.allergies {
        if !allergies.is_empty() {
            println!("Allergies: {}", allergies);
        }
    }
    if let Some(ref goals) = profile.goals {
        println!("Goals:     {}", goals);
    }
    if let Some(ref last) = profile.last_assessment {
        println!("Assessed:  {}", last);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_wraps_type_and_concerns() {
        let assessment = SkinAssessment {
            skin_type: SkinType::Oily,
            concerns: vec![SkinConcern::Acne, SkinConcern::Redness],
            allergies: None,
            goals: Some("clear skin".into()),
        };

        let payload = serde_json::to_value(assessment.into_payload()).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "skinType": [{"type": "OILY"}],
                "concerns": [{"concern": "ACNE"}, {"concern": "REDNESS"}],
                "allergies": "",
                "goals": "clear skin",
            })
        );
    }
}
