// jmap-client/src/error.rs
use crate::http::HttpError;
use serde_json::Value;
use thiserror::Error;

/// Method-level error type strings (RFC 8620 Section 3.6.2)
pub mod error_types {
    pub const SERVER_UNAVAILABLE: &str = "serverUnavailable";
    pub const SERVER_FAIL: &str = "serverFail";
    pub const SERVER_PARTIAL_FAIL: &str = "serverPartialFail";
    pub const UNKNOWN_METHOD: &str = "unknownMethod";
    pub const INVALID_ARGUMENTS: &str = "invalidArguments";
    pub const INVALID_RESULT_REFERENCE: &str = "invalidResultReference";
    pub const FORBIDDEN: &str = "forbidden";
    pub const ACCOUNT_NOT_FOUND: &str = "accountNotFound";
    pub const ACCOUNT_NOT_SUPPORTED_BY_METHOD: &str = "accountNotSupportedByMethod";
    pub const ACCOUNT_READ_ONLY: &str = "accountReadOnly";
}

/// An error response to a single method call, e.g. `["MaskedEmail/get/error", {...}, "0"]`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodError {
    /// Full method name as returned, including the `/error` suffix
    pub method: String,
    /// The `type` member of the error object, when the payload carried one
    pub type_: Option<String>,
    /// The `description` (or `message`) member of the error object
    pub description: Option<String>,
    /// Raw payload, `None` if the entry had no payload at all
    pub raw: Option<Value>,
}

impl MethodError {
    pub(crate) fn from_entry(method: &str, payload: Option<&Value>) -> Self {
        let object = payload.and_then(Value::as_object);
        let type_ = object
            .and_then(|o| o.get("type"))
            .and_then(Value::as_str)
            .map(String::from);
        let description = object
            .and_then(|o| o.get("description").or_else(|| o.get("message")))
            .and_then(Value::as_str)
            .map(String::from);

        Self {
            method: method.to_string(),
            type_,
            description,
            raw: payload.cloned(),
        }
    }

    /// True when the payload had a structured `type`
    pub fn is_structured(&self) -> bool {
        self.type_.is_some()
    }
}

impl std::fmt::Display for MethodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.type_, &self.description, &self.raw) {
            (Some(type_), Some(description), _) => write!(f, "{} - {}", type_, description),
            (Some(type_), None, _) => write!(f, "{}", type_),
            (None, _, Some(raw)) => write!(f, "in method '{}': {}", self.method, raw),
            (None, _, None) => write!(f, "in method '{}'", self.method),
        }
    }
}

impl std::error::Error for MethodError {}

/// Errors raised while building, sending or interpreting a JMAP request
#[derive(Debug, Error)]
pub enum JmapError {
    /// Arguments for a method call could not be serialised. This is a caller bug.
    #[error("failed to serialise arguments for '{method}': {source}")]
    Serialize {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("empty methodResponses array in JMAP response")]
    EmptyResponse,

    /// Top-level `methodErrors` list, surfaced verbatim
    #[error("JMAP method errors in response: {}", render_list(.0))]
    Protocol(Vec<Value>),

    #[error("invalid method response structure at index {index}: expected at least 2 elements, got {len}")]
    MalformedEntry { index: usize, len: usize },

    #[error("method name at index {index} is not a string")]
    InvalidMethodName { index: usize },

    #[error("JMAP error: {0}")]
    Method(MethodError),

    #[error("method response index {index} out of range (have {available} responses)")]
    IndexOutOfRange { index: usize, available: usize },

    #[error("method response at index {index} has {len} elements, expected at least {expected}")]
    TooFewElements {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("received empty response body")]
    EmptyBody,

    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Http(#[from] HttpError),
}

fn render_list(list: &[Value]) -> String {
    Value::Array(list.to_vec()).to_string()
}

impl JmapError {
    /// The method error carried by this error, if any
    pub fn method_error(&self) -> Option<&MethodError> {
        match self {
            Self::Method(err) => Some(err),
            _ => None,
        }
    }

    /// Transport failures that may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_retryable())
    }
}
