// jmap-client/src/types.rs
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// JMAP Session response (RFC 8620 Section 2)
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// The URL to use for JMAP API requests
    #[serde(rename = "apiUrl")]
    pub api_url: String,
    /// Session-level capabilities, keyed by capability URN
    #[serde(default)]
    pub capabilities: HashMap<String, serde_json::Value>,
    /// The accounts available to the user
    pub accounts: HashMap<String, AccountData>,
    /// Account id to use by default for each capability
    #[serde(default)]
    #[serde(rename = "primaryAccounts")]
    pub primary_accounts: HashMap<String, String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Session {
    /// Pick the account to operate on: the primary account for `capability`,
    /// else a personal account, else any account.
    pub fn select_account_id(&self, capability: &str) -> Option<&str> {
        if let Some(id) = self.primary_accounts.get(capability) {
            if self.accounts.contains_key(id) {
                return Some(id.as_str());
            }
        }

        // HashMap order is arbitrary; sort so the fallback is stable
        let mut ids: Vec<&str> = self.accounts.keys().map(String::as_str).collect();
        ids.sort_unstable();

        ids.iter()
            .find(|id| {
                self.accounts
                    .get(**id)
                    .and_then(|data| data.is_personal)
                    .unwrap_or(false)
            })
            .or_else(|| ids.first())
            .copied()
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains_key(capability)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountData {
    pub name: Option<String>,
    #[serde(rename = "isPersonal")]
    pub is_personal: Option<bool>,
    #[serde(rename = "isReadOnly")]
    pub is_read_only: Option<bool>,
    #[serde(rename = "accountCapabilities")]
    pub account_capabilities: Option<HashMap<String, serde_json::Value>>,
}
