// jmap-client/src/request.rs
use crate::error::JmapError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JMAP_CORE_CAPABILITY: &str = "urn:ietf:params:jmap:core";
pub const MASKED_EMAIL_CAPABILITY: &str = "https://www.fastmail.com/dev/maskedemail";

/// Capabilities declared by every request this crate builds
pub const DEFAULT_USING: [&str; 2] = [JMAP_CORE_CAPABILITY, MASKED_EMAIL_CAPABILITY];

/// One method call, serialised as `[name, arguments, callId]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation(pub String, pub Value, pub String);

impl Invocation {
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn arguments(&self) -> &Value {
        &self.1
    }

    pub fn call_id(&self) -> &str {
        &self.2
    }
}

/// JMAP request envelope (RFC 8620 Section 3.3)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub using: Vec<String>,
    #[serde(rename = "methodCalls")]
    pub method_calls: Vec<Invocation>,
}

impl Request {
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }
}

/// Accumulates method calls in order. Call ids default to the call's position.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    using: Vec<String>,
    calls: Vec<Invocation>,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::with_using(&DEFAULT_USING)
    }
}

impl RequestBuilder {
    pub fn with_using(using: &[&str]) -> Self {
        Self {
            using: using.iter().map(|s| s.to_string()).collect(),
            calls: Vec::new(),
        }
    }

    /// Append a call with an automatically assigned call id
    pub fn call<A: Serialize + ?Sized>(self, method: &str, arguments: &A) -> Result<Self, JmapError> {
        let call_id = self.calls.len().to_string();
        self.call_with_id(method, arguments, &call_id)
    }

    pub fn call_with_id<A: Serialize + ?Sized>(
        mut self,
        method: &str,
        arguments: &A,
        call_id: &str,
    ) -> Result<Self, JmapError> {
        let arguments = serde_json::to_value(arguments).map_err(|source| JmapError::Serialize {
            method: method.to_string(),
            source,
        })?;
        self.calls
            .push(Invocation(method.to_string(), arguments, call_id.to_string()));
        Ok(self)
    }

    pub fn build(self) -> Request {
        Request {
            using: self.using,
            method_calls: self.calls,
        }
    }
}
