// jmap-client/src/client.rs
use crate::error::JmapError;
use crate::http::HttpClient;
use crate::request::{Request, RequestBuilder};
use crate::response::Response;
use crate::types::Session;
use serde::Serialize;
use serde_json::Value;

pub struct JmapClient<C: HttpClient> {
    http: C,
    api_url: String,
    account_id: String,
}

impl<C: HttpClient> JmapClient<C> {
    pub fn new(http: C, api_url: String, account_id: String) -> Self {
        Self {
            http,
            api_url,
            account_id,
        }
    }

    /// Fetch and decode the session resource
    pub async fn fetch_session(http: &C, session_url: &str) -> Result<Session, JmapError> {
        let bytes = http.get(session_url).await?;
        serde_json::from_slice(&bytes).map_err(|source| JmapError::Decode {
            what: "JMAP session",
            source,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Send a request and return the validated response.
    /// Transport failures come back as `JmapError::Http` unchanged.
    pub async fn send(&self, request: &Request) -> Result<Response, JmapError> {
        let body = serde_json::to_vec(request).map_err(|source| JmapError::Serialize {
            method: request
                .method_calls
                .first()
                .map(|call| call.name().to_string())
                .unwrap_or_default(),
            source,
        })?;

        let resp_bytes = self.http.post_json(&self.api_url, body).await?;
        let response = Response::from_slice(&resp_bytes)?;
        response.validate()?;
        Ok(response)
    }

    /// Make a single-call request and return the arguments of its response
    pub async fn call_method_with_using<A: Serialize + ?Sized>(
        &self,
        using: &[&str],
        method: &str,
        arguments: &A,
    ) -> Result<Value, JmapError> {
        let request = RequestBuilder::with_using(using)
            .call(method, arguments)?
            .build();
        let response = self.send(&request).await?;
        response.arguments(0).cloned()
    }
}
