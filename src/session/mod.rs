//! Session store: bearer credential + cached user profile
//!
//! One explicitly owned store shared behind a mutex; every consumer reads
//! from it rather than holding a private copy. State changes are mirrored
//! to disk (write-through), and clearing the credential clears the profile
//! and the persisted copies together.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::models::UserData;

pub type SharedSession = Arc<Mutex<Session>>;

/// Persisted session state. The profile is stored as a JSON string under the
/// same key the web client used, which also keeps the TOML flat.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    token: Option<String>,
    #[serde(rename = "userData")]
    user_data: Option<String>,
}

/// The current authenticated identity: bearer token plus cached profile.
#[derive(Debug)]
pub struct Session {
    token: Option<String>,
    user: Option<UserData>,
    /// Backing file; `None` keeps the session purely in memory (tests).
    path: Option<PathBuf>,
}

impl Session {
    /// Load the persisted session from the config directory.
    pub fn load() -> Result<Self> {
        let path = Config::config_dir()?.join("session.toml");
        Self::load_from(path)
    }

    /// Load a session backed by an explicit file path.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                token: None,
                user: None,
                path: Some(path),
            });
        }

        let content = fs::read_to_string(&path).context("Failed to read session file")?;
        let persisted: PersistedSession =
            toml::from_str(&content).context("Failed to parse session file")?;

        let user = persisted
            .user_data
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok());

        Ok(Self {
            token: persisted.token,
            user,
            path: Some(path),
        })
    }

    /// A session with no backing file, for tests.
    pub fn in_memory() -> Self {
        Self {
            token: None,
            user: None,
            path: None,
        }
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn token(&self) -> Option<String> {
        self.token.clone()
    }

    pub fn user(&self) -> Option<UserData> {
        self.user.clone()
    }

    /// True iff both credential and profile are present. Either alone is
    /// treated as unauthenticated.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    /// Token present but profile missing: the caller must fetch the profile
    /// or tear the session down.
    pub fn needs_profile(&self) -> bool {
        self.token.is_some() && self.user.is_none()
    }

    /// Store credential and profile together (login/register success).
    pub fn set_credentials(&mut self, token: String, user: UserData) -> Result<()> {
        self.token = Some(token);
        self.user = Some(user);
        self.persist()
    }

    /// Replace the cached profile (profile fetch or update).
    pub fn set_user(&mut self, user: UserData) -> Result<()> {
        self.user = Some(user);
        self.persist()
    }

    /// Drop credential, profile, and their persisted copies.
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;
        self.user = None;
        self.persist()
    }

    /// Write-through mirror of the current state.
    fn persist(&self) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let persisted = PersistedSession {
            token: self.token.clone(),
            user_data: self
                .user
                .as_ref()
                .map(|u| serde_json::to_string(u))
                .transpose()
                .context("Failed to serialize profile")?,
        };

        let content = toml::to_string_pretty(&persisted).context("Failed to serialize session")?;
        fs::write(path, content).context("Failed to write session file")?;

        // Restrictive permissions on the session file (contains the token)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(path, perms).context("Failed to set session permissions")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn test_user() -> UserData {
        serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "pat@example.com",
            "name": "Pat",
            "role": "USER",
        }))
        .unwrap()
    }

    fn temp_session_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("derm-cli-test-{}", uuid::Uuid::new_v4()))
            .join("session.toml")
    }

    #[test]
    fn authenticated_requires_token_and_profile() {
        let mut session = Session::in_memory();
        assert!(!session.is_authenticated());

        session.token = Some("t1".into());
        assert!(!session.is_authenticated());
        assert!(session.needs_profile());

        session.user = Some(test_user());
        assert!(session.is_authenticated());

        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn persists_and_reloads() {
        let path = temp_session_path();
        let mut session = Session::load_from(path.clone()).unwrap();
        session
            .set_credentials("t1".into(), test_user())
            .unwrap();

        let reloaded = Session::load_from(path.clone()).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("t1"));
        assert_eq!(reloaded.user().unwrap().role, Role::User);
        assert!(reloaded.is_authenticated());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn clear_removes_persisted_copies() {
        let path = temp_session_path();
        let mut session = Session::load_from(path.clone()).unwrap();
        session
            .set_credentials("t1".into(), test_user())
            .unwrap();
        session.clear().unwrap();

        let reloaded = Session::load_from(path.clone()).unwrap();
        assert!(reloaded.token().is_none());
        assert!(reloaded.user().is_none());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn stored_token_without_profile_is_not_authenticated() {
        let path = temp_session_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "token = \"t1\"\n").unwrap();

        let session = Session::load_from(path.clone()).unwrap();
        assert!(!session.is_authenticated());
        assert!(session.needs_profile());

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
