//! User-related models

use serde::{Deserialize, Serialize};

/// Platform role. Wire values match the backend enum verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "DERMATOLOGISTS")]
    Dermatologist,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl Role {
    /// Parse a role from its wire/CLI spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Some(Role::User),
            "DERMATOLOGISTS" | "DERMATOLOGIST" => Some(Role::Dermatologist),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Dermatologist => "DERMATOLOGISTS",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub image: Option<String>,
}

/// Login/register response envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub user: Option<UserData>,
    pub token: Option<String>,
}

/// Patient summary as seen by a dermatologist
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub skin_type: Option<String>,
    pub last_visit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_spelling_round_trips() {
        for role in [Role::User, Role::Dermatologist, Role::Admin] {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
        // The backend spells the dermatologist role in the plural.
        assert_eq!(
            serde_json::to_string(&Role::Dermatologist).unwrap(),
            "\"DERMATOLOGISTS\""
        );
    }

    #[test]
    fn role_parse_accepts_singular() {
        assert_eq!(Role::parse("dermatologist"), Some(Role::Dermatologist));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("patient"), None);
    }
}
