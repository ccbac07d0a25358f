//! Authenticated HTTP client for the DermaCare REST API
//!
//! Wraps reqwest::Client with bearer-token injection and session-expiry
//! handling: a 401 from any non-auth endpoint tears the session down and
//! surfaces as `ApiError::SessionExpired`.

use anyhow::{Context, Result};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::config::Config;
use crate::guard;
use crate::session::{Session, SharedSession};

/// Routes whose 401 responses are ordinary failures, not session expiry.
const AUTH_ROUTES: &[&str] = &["/api/auth/login", "/api/auth/register"];

pub fn is_auth_route(path: &str) -> bool {
    AUTH_ROUTES.iter().any(|r| path.starts_with(r))
}

/// One-shot marker: the session teardown for a logical request runs at most
/// once, even if the same request is checked again.
#[derive(Debug, Default)]
pub struct RetryMarker(bool);

impl RetryMarker {
    /// Returns true the first time, false on every later call.
    fn consume(&mut self) -> bool {
        !std::mem::replace(&mut self.0, true)
    }
}

/// Authenticated client shared by all domain services.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SharedSession,
}

impl ApiClient {
    /// Load config and the persisted session, then reconcile: a stored token
    /// without a cached profile triggers a profile fetch, and a failed fetch
    /// tears the session down rather than leaving it half-populated.
    pub async fn connect() -> Result<Self> {
        let config = Config::load()?;
        let session = Session::load()?.into_shared();
        let client = Self::with_parts(config.base_url, session);

        let needs_profile = client.session.lock().unwrap().needs_profile();
        if needs_profile {
            tracing::info!("Stored token without cached profile, fetching profile...");
            match client.fetch_profile().await {
                Ok(user) => {
                    client.session.lock().unwrap().set_user(user)?;
                }
                Err(e) => {
                    // Torn down, not left half-populated: the token without a
                    // fetchable profile collapses to logged-out.
                    tracing::warn!("Profile fetch failed, clearing stored session: {:#}", e);
                    client.session.lock().unwrap().clear()?;
                }
            }
        }

        Ok(client)
    }

    /// Build a client from explicit parts (injectable for tests).
    pub fn with_parts(base_url: impl Into<String>, session: SharedSession) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.session.lock().unwrap().token()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request with the bearer credential attached when present.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("GET {}", path);
        self.execute(self.request(Method::GET, path), path).await
    }

    pub async fn get_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("GET {} (query)", path);
        self.execute(self.request(Method::GET, path).query(query), path)
            .await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("POST {}", path);
        self.execute(self.request(Method::POST, path).json(body), path)
            .await
    }

    pub async fn put_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("PUT {}", path);
        self.execute(self.request(Method::PUT, path).json(body), path)
            .await
    }

    pub async fn patch_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("PATCH {}", path);
        self.execute(self.request(Method::PATCH, path).json(body), path)
            .await
    }

    pub async fn patch_empty(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("PATCH {}", path);
        self.execute(self.request(Method::PATCH, path), path).await
    }

    pub async fn delete(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("DELETE {}", path);
        self.execute(self.request(Method::DELETE, path), path).await
    }

    pub async fn delete_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("DELETE {}", path);
        self.execute(self.request(Method::DELETE, path).json(body), path)
            .await
    }

    pub async fn post_multipart(
        &self,
        path: &str,
        form: Form,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("POST {} (multipart)", path);
        self.execute(self.request(Method::POST, path).multipart(form), path)
            .await
    }

    pub async fn put_multipart(
        &self,
        path: &str,
        form: Form,
    ) -> Result<reqwest::Response, ApiError> {
        tracing::debug!("PUT {} (multipart)", path);
        self.execute(self.request(Method::PUT, path).multipart(form), path)
            .await
    }

    /// Decode a JSON body, mapping parse failures to `ApiError::Decode`.
    pub async fn decode<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        resp.json().await.map_err(|source| ApiError::Decode {
            url: self.url(path),
            source,
        })
    }

    /// Send and check one request. No retry, backoff, or queuing: transient
    /// failures propagate to the caller.
    async fn execute(
        &self,
        builder: RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let resp = builder.send().await?;
        let mut marker = RetryMarker::default();
        self.check_response(resp, path, &mut marker).await
    }

    /// Inspect a response: 401 on a non-auth route expires the session;
    /// other non-2xx statuses map to `ApiError::Status`.
    pub(crate) async fn check_response(
        &self,
        resp: reqwest::Response,
        path: &str,
        marker: &mut RetryMarker,
    ) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED && !is_auth_route(path) {
            self.expire_session(marker);
            return Err(ApiError::SessionExpired {
                redirect: guard::LOGIN_VIEW,
            });
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            url: self.url(path),
            body,
        })
    }

    /// Tear the session down at most once per logical request.
    pub(crate) fn expire_session(&self, marker: &mut RetryMarker) -> bool {
        if !marker.consume() {
            tracing::debug!("401 already handled for this request, skipping teardown");
            return false;
        }

        let mut session = self.session.lock().unwrap();
        if let Err(e) = session.clear() {
            tracing::warn!("Failed to clear persisted session: {:#}", e);
        }
        tracing::info!("Session expired (401), credentials cleared");
        true
    }

    /// GET /api/user/profile, used to repopulate a restored session.
    pub async fn fetch_profile(&self) -> Result<crate::models::UserData, ApiError> {
        #[derive(serde::Deserialize)]
        struct ProfileResponse {
            user: crate::models::UserData,
        }

        let resp = self.get("/api/user/profile").await?;
        let body: ProfileResponse = self.decode(resp, "/api/user/profile").await?;
        Ok(body.user)
    }
}

/// Load config and build a connected client; shared entry point for the
/// command layer.
pub async fn connect() -> Result<ApiClient> {
    ApiClient::connect()
        .await
        .context("Failed to initialize API client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserData;

    fn test_user() -> UserData {
        serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "pat@example.com",
            "name": "Pat",
            "role": "USER",
        }))
        .unwrap()
    }

    fn authed_client() -> ApiClient {
        let mut session = Session::in_memory();
        session.set_credentials("t1".into(), test_user()).unwrap();
        ApiClient::with_parts("http://localhost:5000", session.into_shared())
    }

    #[test]
    fn auth_routes_are_exempt() {
        assert!(is_auth_route("/api/auth/login"));
        assert!(is_auth_route("/api/auth/register"));
        assert!(!is_auth_route("/api/user/profile"));
        assert!(!is_auth_route("/api/chat"));
    }

    #[test]
    fn bearer_header_is_attached_when_token_present() {
        let client = authed_client();
        let req = client
            .request(Method::GET, "/api/user/profile")
            .build()
            .unwrap();
        assert_eq!(
            req.headers().get("authorization").unwrap(),
            "Bearer t1"
        );
    }

    #[test]
    fn no_bearer_header_without_token() {
        let client =
            ApiClient::with_parts("http://localhost:5000", Session::in_memory().into_shared());
        let req = client
            .request(Method::POST, "/api/auth/login")
            .build()
            .unwrap();
        assert!(req.headers().get("authorization").is_none());
    }

    #[test]
    fn expire_session_runs_once_per_request() {
        let client = authed_client();
        let mut marker = RetryMarker::default();

        assert!(client.expire_session(&mut marker));
        assert!(!client.session().lock().unwrap().is_authenticated());

        // A second 401 for the same logical request must not tear down again:
        // restore credentials and verify they survive the repeated check.
        client
            .session()
            .lock()
            .unwrap()
            .set_credentials("t2".into(), test_user())
            .unwrap();
        assert!(!client.expire_session(&mut marker));
        assert!(client.session().lock().unwrap().is_authenticated());
    }

    #[test]
    fn separate_requests_each_tear_down() {
        let client = authed_client();

        let mut first = RetryMarker::default();
        assert!(client.expire_session(&mut first));

        client
            .session()
            .lock()
            .unwrap()
            .set_credentials("t2".into(), test_user())
            .unwrap();

        let mut second = RetryMarker::default();
        assert!(client.expire_session(&mut second));
        assert!(!client.session().lock().unwrap().is_authenticated());
    }

    // -- end-to-end: login, authorized request, forced 401 --

    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serve one canned response per accepted connection, forwarding each
    /// request head+body to the returned channel. `Connection: close` keeps
    /// reqwest from pooling, so every request is its own connection.
    async fn spawn_server(
        responses: Vec<String>,
    ) -> (std::net::SocketAddr, tokio::sync::mpsc::Receiver<String>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::mpsc::channel(responses.len());

        tokio::spawn(async move {
            for response in responses {
                let (mut sock, _) = listener.accept().await.unwrap();
                let request = read_request(&mut sock).await;
                tx.send(request).await.ok();
                sock.write_all(response.as_bytes()).await.unwrap();
                sock.shutdown().await.ok();
            }
        });

        (addr, rx)
    }

    /// Read one HTTP/1.1 request: headers, then any Content-Length body.
    async fn read_request(sock: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = sock.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(str::trim).map(String::from))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[tokio::test]
    async fn login_then_forced_401_clears_session() {
        let login_body = serde_json::json!({
            "success": true,
            "message": "ok",
            "user": {"id": "u1", "email": "pat@example.com", "name": "Pat", "role": "USER"},
            "token": "t1",
        })
        .to_string();

        let (addr, mut requests) = spawn_server(vec![
            json_response("200 OK", &login_body),
            json_response("401 Unauthorized", r#"{"message":"expired"}"#),
        ])
        .await;

        let session_path = std::env::temp_dir()
            .join(format!("derm-cli-test-{}", uuid::Uuid::new_v4()))
            .join("session.toml");
        let session = Session::load_from(session_path.clone()).unwrap().into_shared();
        let client = ApiClient::with_parts(format!("http://{}", addr), session);

        // Login stores token and profile.
        crate::api::auth::login(&client, "pat@example.com", "hunter2")
            .await
            .unwrap();
        assert!(client.session().lock().unwrap().is_authenticated());
        assert_eq!(client.token().as_deref(), Some("t1"));

        let login_request = requests.recv().await.unwrap();
        assert!(login_request.starts_with("POST /api/auth/login"));

        // The next request carries the bearer credential and hits a forced
        // 401: the session and its persisted copies are torn down.
        let err = client.fetch_profile().await.unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired { redirect: "/login" }));

        let profile_request = requests.recv().await.unwrap();
        assert!(profile_request.starts_with("GET /api/user/profile"));
        assert!(profile_request
            .to_ascii_lowercase()
            .contains("authorization: bearer t1"));

        assert!(!client.session().lock().unwrap().is_authenticated());
        let reloaded = Session::load_from(session_path.clone()).unwrap();
        assert!(reloaded.token().is_none());
        assert!(reloaded.user().is_none());

        std::fs::remove_dir_all(session_path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn auth_route_401_does_not_tear_down() {
        let (addr, _requests) = spawn_server(vec![json_response(
            "401 Unauthorized",
            r#"{"success":false,"message":"bad credentials"}"#,
        )])
        .await;

        let client = authed_client();
        let client = ApiClient::with_parts(
            format!("http://{}", addr),
            client.session().clone(),
        );

        let err = crate::api::auth::login_data(&client, "pat@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));

        // The stored session survives a rejected login attempt.
        assert!(client.session().lock().unwrap().is_authenticated());
        assert_eq!(client.token().as_deref(), Some("t1"));
    }
}
