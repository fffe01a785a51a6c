// jmap-client/src/http/mod.rs
use async_trait::async_trait;
use std::time::Duration;

/// Request timeout used when the caller does not pick one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error from the HTTP transport. Passed through the JMAP layer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    /// Status code, `None` when no response was received (connect failure, timeout)
    pub status: Option<u16>,
    pub message: String,
}

impl HttpError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// No response, rate limiting, or a server-side failure. Other statuses
    /// (bad credentials, missing resource) will not improve on retry.
    pub fn is_retryable(&self) -> bool {
        match self.status {
            None => true,
            Some(status) => status == 429 || (500..600).contains(&status),
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP error {}: {}", status, self.message),
            None => write!(f, "HTTP error: {}", self.message),
        }
    }
}

impl std::error::Error for HttpError {}

/// Generic HTTP client trait - users can implement their own
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// POST JSON data to URL, return response bytes
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, HttpError>;

    /// GET a resource (used for the session document)
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError>;
}

/// Redact a bearer token for logging, keeping the last four characters.
/// Tokens of four characters or fewer are returned unchanged.
pub fn redact_token(token: &str) -> String {
    let count = token.chars().count();
    if count <= 4 {
        return token.to_string();
    }
    let tail: String = token.chars().skip(count - 4).collect();
    format!("[redacted token]...{}", tail)
}

#[cfg(feature = "reqwest")]
pub mod reqwest;

#[cfg(feature = "reqwest")]
pub use reqwest::ReqwestClient;
