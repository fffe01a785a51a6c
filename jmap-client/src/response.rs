// jmap-client/src/response.rs
//
// JMAP returns success and failure through the same envelope shape, so every
// response goes through `validate` before any field is read, and positional
// access goes through `expect`.
use crate::error::{JmapError, MethodError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ERROR_SUFFIX: &str = "/error";

/// JMAP response envelope. Entries are kept loosely typed so malformed
/// responses can be reported instead of failing deserialisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "methodResponses", default)]
    pub method_responses: Vec<Vec<Value>>,
    #[serde(rename = "methodErrors", default, skip_serializing_if = "Vec::is_empty")]
    pub method_errors: Vec<Value>,
    #[serde(rename = "sessionState", default, skip_serializing_if = "Option::is_none")]
    pub session_state: Option<String>,
}

impl Response {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, JmapError> {
        if bytes.is_empty() {
            return Err(JmapError::EmptyBody);
        }
        serde_json::from_slice(bytes).map_err(|source| JmapError::Decode {
            what: "JMAP response",
            source,
        })
    }

    /// Check the whole envelope for protocol-level failures
    pub fn validate(&self) -> Result<(), JmapError> {
        if !self.method_errors.is_empty() {
            return Err(JmapError::Protocol(self.method_errors.clone()));
        }

        if self.method_responses.is_empty() {
            return Err(JmapError::EmptyResponse);
        }

        for (index, entry) in self.method_responses.iter().enumerate() {
            if entry.len() < 2 {
                return Err(JmapError::MalformedEntry {
                    index,
                    len: entry.len(),
                });
            }

            let name = entry
                .first()
                .and_then(Value::as_str)
                .ok_or(JmapError::InvalidMethodName { index })?;
            if is_error_name(name) {
                return Err(JmapError::Method(MethodError::from_entry(name, entry.get(1))));
            }
        }

        Ok(())
    }

    /// Bounds-checked access to one response entry
    pub fn expect(&self, index: usize, min_elements: usize) -> Result<&[Value], JmapError> {
        if self.method_responses.is_empty() {
            return Err(JmapError::EmptyResponse);
        }

        let entry = self
            .method_responses
            .get(index)
            .ok_or(JmapError::IndexOutOfRange {
                index,
                available: self.method_responses.len(),
            })?;

        if entry.len() < min_elements {
            return Err(JmapError::TooFewElements {
                index,
                len: entry.len(),
                expected: min_elements,
            });
        }

        Ok(entry)
    }

    /// Method name of the entry at `index`
    pub fn method_name(&self, index: usize) -> Result<&str, JmapError> {
        self.expect(index, 1)?
            .first()
            .and_then(Value::as_str)
            .ok_or(JmapError::InvalidMethodName { index })
    }

    /// Arguments object of the entry at `index`
    pub fn arguments(&self, index: usize) -> Result<&Value, JmapError> {
        let entry = self.expect(index, 2)?;
        entry.get(1).ok_or(JmapError::TooFewElements {
            index,
            len: entry.len(),
            expected: 2,
        })
    }
}

fn is_error_name(name: &str) -> bool {
    name.strip_suffix(ERROR_SUFFIX)
        .is_some_and(|prefix| !prefix.is_empty())
}
