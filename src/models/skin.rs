//! Skin profile models

use serde::{Deserialize, Serialize};

/// Skin type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkinType {
    Dry,
    Oily,
    Combination,
    Normal,
    Sensitive,
}

/// Skin concern categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkinConcern {
    Acne,
    Aging,
    Pigmentation,
    Sensitivity,
    Dryness,
    Oiliness,
    Redness,
    UnevenTexture,
}

/// Skin profile entity
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinProfileData {
    pub id: String,
    pub user_id: String,
    pub skin_type: SkinType,
    pub concerns: Vec<SkinConcern>,
    pub allergies: Option<String>,
    pub goals: Option<String>,
    pub last_assessment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concern_wire_names_are_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&SkinConcern::UnevenTexture).unwrap(),
            "\"UNEVEN_TEXTURE\""
        );
        assert_eq!(
            serde_json::to_string(&SkinType::Combination).unwrap(),
            "\"COMBINATION\""
        );
    }
}
