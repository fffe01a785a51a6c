// masked-email/src/masked_email.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Masked Email (Fastmail extension). An immutable snapshot of the remote record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaskedEmail {
    /// Empty for some historical records
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: MaskedEmailState,
    #[serde(rename = "forDomain", default, deserialize_with = "null_as_default")]
    pub for_domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "lastMessageAt", default, skip_serializing_if = "Option::is_none")]
    pub last_message_at: Option<String>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "createdBy", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Older records carry explicit nulls where newer ones omit the field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl MaskedEmail {
    /// `forDomain`, or `description` for older records that stored the domain there
    pub fn domain_source(&self) -> &str {
        if self.for_domain.trim().is_empty() {
            &self.description
        } else {
            &self.for_domain
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.state == MaskedEmailState::Deleted
    }
}

/// Masked Email state (Fastmail extension).
///
/// Unrecognised states are kept as `Unknown` instead of failing to decode so
/// that new server-side states do not break listing or selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaskedEmailState {
    #[default]
    Pending,
    Enabled,
    Disabled,
    Deleted,
    Unknown(String),
}

/// Selection order, most preferred first
const SELECTION_ORDER: [&str; 4] = ["enabled", "pending", "disabled", "deleted"];

impl MaskedEmailState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Deleted => "deleted",
            Self::Unknown(state) => state,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Lower wins. Unknown states rank after every known state.
    pub fn priority(&self) -> usize {
        SELECTION_ORDER
            .iter()
            .position(|s| *s == self.as_str() && self.is_known())
            .unwrap_or(usize::MAX)
    }
}

impl From<String> for MaskedEmailState {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "enabled" => Self::Enabled,
            "disabled" => Self::Disabled,
            "deleted" => Self::Deleted,
            _ => Self::Unknown(value),
        }
    }
}

impl From<MaskedEmailState> for String {
    fn from(state: MaskedEmailState) -> Self {
        match state {
            MaskedEmailState::Unknown(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for MaskedEmailState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for MaskedEmailState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
