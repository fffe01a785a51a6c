// jmap-client/src/lib.rs
pub mod client;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod types;

pub use client::JmapClient;
pub use error::{JmapError, MethodError};
pub use http::{redact_token, HttpClient, HttpError, DEFAULT_TIMEOUT};
pub use request::{
    Invocation, Request, RequestBuilder, DEFAULT_USING, JMAP_CORE_CAPABILITY,
    MASKED_EMAIL_CAPABILITY,
};
pub use response::Response;
pub use types::{AccountData, Session};

// Re-export error types separately
pub use error::error_types;

// Re-export reqwest client when feature is enabled
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
