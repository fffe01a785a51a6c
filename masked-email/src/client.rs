// masked-email/src/client.rs
use crate::config::Config;
use crate::domain::Origin;
use crate::error::ClientError;
use crate::masked_email::{MaskedEmail, MaskedEmailState};
use crate::matcher::matches_domain;
use jmap_client::{JmapClient, JmapError, ReqwestClient, DEFAULT_USING, MASKED_EMAIL_CAPABILITY};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

const METHOD_GET: &str = "MaskedEmail/get";
const METHOD_SET: &str = "MaskedEmail/set";

/// Creation id used in `MaskedEmail/set` create requests
const CREATION_ID: &str = "new";

const MASKED_EMAIL_PROPERTIES: [&str; 8] = [
    "id",
    "email",
    "state",
    "forDomain",
    "description",
    "url",
    "createdAt",
    "lastMessageAt",
];

#[derive(Debug, Deserialize)]
struct GetResponse {
    #[serde(default)]
    list: Vec<MaskedEmail>,
}

#[derive(Debug, Default, Deserialize)]
struct SetResponse {
    #[serde(default)]
    created: Option<HashMap<String, Value>>,
    #[serde(default)]
    updated: Option<HashMap<String, Value>>,
    #[serde(default, rename = "notCreated")]
    not_created: Option<HashMap<String, Value>>,
    #[serde(default, rename = "notUpdated")]
    not_updated: Option<HashMap<String, Value>>,
}

/// Render a JMAP SetError object as "type: description"
fn set_error_reason(err: &Value) -> String {
    let type_ = err.get("type").and_then(Value::as_str).unwrap_or("unknown");
    match err.get("description").and_then(Value::as_str) {
        Some(description) => format!("{}: {}", type_, description),
        None => type_.to_string(),
    }
}

fn decode<T: serde::de::DeserializeOwned>(what: &'static str, value: Value) -> Result<T, JmapError> {
    serde_json::from_value(value).map_err(|source| JmapError::Decode { what, source })
}

pub struct FastmailClient {
    inner: JmapClient<ReqwestClient>,
}

impl FastmailClient {
    /// Build a client from validated configuration. Without a configured
    /// account id the JMAP session is fetched to discover one.
    pub async fn connect(config: &Config) -> Result<Self, ClientError> {
        let http = ReqwestClient::with_timeout(config.timeout())?.with_token(config.token.clone());

        let inner = match &config.account_id {
            Some(account_id) => JmapClient::new(http, config.api_url.clone(), account_id.clone()),
            None => {
                let session = JmapClient::fetch_session(&http, &config.session_url).await?;
                if !session.has_capability(MASKED_EMAIL_CAPABILITY) {
                    tracing::warn!(
                        capability = MASKED_EMAIL_CAPABILITY,
                        "session does not advertise masked email support"
                    );
                }
                let account_id = session
                    .select_account_id(MASKED_EMAIL_CAPABILITY)
                    .ok_or(ClientError::NoAccount)?
                    .to_string();
                tracing::debug!(account_id = %account_id, api_url = %session.api_url, "using session account");
                JmapClient::new(http, session.api_url.clone(), account_id)
            }
        };

        Ok(Self { inner })
    }

    pub fn account_id(&self) -> &str {
        self.inner.account_id()
    }

    async fn call(&self, method: &str, arguments: Value) -> Result<Value, ClientError> {
        Ok(self
            .inner
            .call_method_with_using(&DEFAULT_USING, method, &arguments)
            .await?)
    }

    /// Every masked email in the account, including deleted ones
    pub async fn fetch_all_aliases(&self) -> Result<Vec<MaskedEmail>, ClientError> {
        let args = self
            .call(
                METHOD_GET,
                json!({
                    "accountId": self.account_id(),
                    "ids": null,
                    "properties": MASKED_EMAIL_PROPERTIES,
                }),
            )
            .await?;

        let response: GetResponse = decode("MaskedEmail/get response", args)?;
        tracing::debug!(count = response.list.len(), "fetched masked emails");
        Ok(response.list)
    }

    /// Non-deleted aliases whose domain is `origin`
    pub async fn aliases_for_domain(&self, origin: &Origin) -> Result<Vec<MaskedEmail>, ClientError> {
        let aliases = self.fetch_all_aliases().await?;
        Ok(aliases
            .into_iter()
            .filter(|alias| !alias.is_deleted() && matches_domain(alias, origin.as_str()))
            .collect())
    }

    pub async fn alias_by_email(&self, email: &str) -> Result<MaskedEmail, ClientError> {
        let aliases = self.fetch_all_aliases().await?;
        aliases
            .into_iter()
            .find(|alias| alias.email == email)
            .ok_or_else(|| ClientError::AliasNotFound {
                email: email.to_string(),
            })
    }

    /// Create an alias for `origin`. The description defaults to the origin.
    pub async fn create_alias(
        &self,
        origin: &Origin,
        description: Option<&str>,
    ) -> Result<MaskedEmail, ClientError> {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(origin.as_str());

        let args = self
            .call(
                METHOD_SET,
                json!({
                    "accountId": self.account_id(),
                    "create": {
                        CREATION_ID: {
                            "forDomain": origin.as_str(),
                            "description": description,
                        }
                    },
                }),
            )
            .await?;

        let mut response: SetResponse = decode("MaskedEmail/set response", args)?;
        if let Some(err) = response
            .not_created
            .as_ref()
            .and_then(|m| m.get(CREATION_ID))
        {
            return Err(ClientError::Rejected {
                id: CREATION_ID.to_string(),
                reason: set_error_reason(err),
            });
        }

        let created = response
            .created
            .as_mut()
            .and_then(|m| m.remove(CREATION_ID))
            .ok_or(ClientError::MissingCreated)?;
        let mut alias: MaskedEmail = decode("created masked email", created)?;

        // The server only echoes properties it set itself
        if alias.for_domain.is_empty() {
            alias.for_domain = origin.to_string();
        }
        if alias.description.is_empty() {
            alias.description = description.to_string();
        }

        tracing::debug!(email = %alias.email, "created masked email");
        Ok(alias)
    }

    pub async fn update_alias_state(
        &self,
        alias: &MaskedEmail,
        state: MaskedEmailState,
    ) -> Result<(), ClientError> {
        if alias.state == state {
            return Err(ClientError::AlreadyInState {
                email: alias.email.clone(),
                state,
            });
        }

        tracing::debug!(email = %alias.email, from = %alias.state, to = %state, "updating state");
        self.update(alias, json!({ "state": state })).await
    }

    pub async fn update_alias_description(
        &self,
        alias: &MaskedEmail,
        description: &str,
    ) -> Result<(), ClientError> {
        self.update(alias, json!({ "description": description })).await
    }

    async fn update(&self, alias: &MaskedEmail, patch: Value) -> Result<(), ClientError> {
        if alias.id.is_empty() {
            return Err(ClientError::MissingIdentifier {
                email: alias.email.clone(),
            });
        }

        let mut update = Map::new();
        update.insert(alias.id.clone(), patch);

        let args = self
            .call(
                METHOD_SET,
                json!({
                    "accountId": self.account_id(),
                    "update": update,
                }),
            )
            .await?;

        let response: SetResponse = decode("MaskedEmail/set response", args)?;
        if let Some(err) = response
            .not_updated
            .as_ref()
            .and_then(|m| m.get(&alias.id))
        {
            return Err(ClientError::Rejected {
                id: alias.id.clone(),
                reason: set_error_reason(err),
            });
        }

        let confirmed = response
            .updated
            .as_ref()
            .is_some_and(|m| m.contains_key(&alias.id));
        if !confirmed {
            return Err(ClientError::UpdateNotConfirmed {
                id: alias.id.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_error_reason() {
        assert_eq!(
            set_error_reason(&json!({"type": "invalidProperties", "description": "bad state"})),
            "invalidProperties: bad state"
        );
        assert_eq!(set_error_reason(&json!({"type": "notFound"})), "notFound");
        assert_eq!(set_error_reason(&json!(null)), "unknown");
    }

    #[test]
    fn test_set_response_tolerates_nulls() {
        let resp: SetResponse = decode(
            "test",
            json!({"created": null, "updated": {"m1": null}, "notUpdated": null}),
        )
        .unwrap();
        assert!(resp.updated.unwrap().contains_key("m1"));
        assert!(resp.not_updated.is_none());
    }
}
