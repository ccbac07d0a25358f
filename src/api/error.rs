//! Client-side error taxonomy

use thiserror::Error;

/// Failure modes of the API surface.
///
/// `SessionExpired` is fatal to the session: the store has already been torn
/// down when it is returned. Everything else leaves local state unchanged and
/// the caller may retry by repeating the action.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Session expired. Run 'derm-cli login'. (redirect: {redirect})")]
    SessionExpired { redirect: &'static str },

    #[error("HTTP {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
