//! Authentication endpoints (/api/auth)
//!
//! First-party email/password login returning a bearer token. A successful
//! login or registration populates the session store; 401s from these routes
//! never tear the session down (they are ordinary failures).

use anyhow::{bail, Result};
use serde::Serialize;

use super::client::ApiClient;
use super::error::ApiError;
use crate::models::{AuthResponse, Role, UserData};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: Role,
}

/// POST /api/auth/login
pub async fn login_data(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<AuthResponse, ApiError> {
    let body = serde_json::to_value(LoginRequest { email, password }).expect("serializable");
    let resp = client.post_json("/api/auth/login", &body).await?;
    client.decode(resp, "/api/auth/login").await
}

/// POST /api/auth/register
pub async fn register_data(
    client: &ApiClient,
    req: &RegisterRequest,
) -> Result<AuthResponse, ApiError> {
    let body = serde_json::to_value(req).expect("serializable");
    let resp = client.post_json("/api/auth/register", &body).await?;
    client.decode(resp, "/api/auth/register").await
}

/// Store credentials from a successful auth response.
fn store_session(client: &ApiClient, auth: AuthResponse) -> Result<UserData> {
    if !auth.success {
        bail!("Authentication rejected: {}", auth.message);
    }
    let (Some(token), Some(user)) = (auth.token, auth.user) else {
        bail!("Malformed auth response: missing token or user");
    };

    client
        .session()
        .lock()
        .unwrap()
        .set_credentials(token, user.clone())?;
    Ok(user)
}

/// Log in and persist the session.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<()> {
    let auth = login_data(client, email, password).await?;
    let user = store_session(client, auth)?;
    println!("Logged in as {} ({})", user.name, user.role);
    Ok(())
}

/// Register a new account and persist the session.
pub async fn register(client: &ApiClient, req: &RegisterRequest) -> Result<()> {
    let auth = register_data(client, req).await?;
    let user = store_session(client, auth)?;
    println!("Registered {} ({})", user.name, user.role);
    Ok(())
}

/// Clear the local session. Purely client-side, like the web client.
pub fn logout(client: &ApiClient) -> Result<()> {
    client.session().lock().unwrap().clear()?;
    println!("Logged out.");
    Ok(())
}

/// Show current authentication status.
pub fn status(client: &ApiClient) {
    let session = client.session().lock().unwrap();
    println!("Backend: {}", client.base_url());
    match (session.is_authenticated(), session.user()) {
        (true, Some(user)) => {
            println!("Status:  logged in");
            println!("User:    {} <{}>", user.name, user.email);
            println!("Role:    {}", user.role);
        }
        _ => {
            println!("Status:  logged out");
        }
    }
}
