// jmap-client/src/http/reqwest.rs
use super::{redact_token, HttpClient, HttpError};
use async_trait::async_trait;
use std::time::Duration;

/// reqwest-backed transport: bearer auth, one attempt per call, bounded by a timeout
pub struct ReqwestClient {
    inner: reqwest::Client,
    bearer_token: Option<String>,
}

impl ReqwestClient {
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::transport(e.to_string()))?;
        Ok(Self {
            inner,
            bearer_token: None,
        })
    }

    pub fn with_token(mut self, token: String) -> Self {
        self.bearer_token = Some(token);
        self
    }

    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<Vec<u8>, HttpError> {
        let req = match &self.bearer_token {
            Some(token) => {
                tracing::debug!(authorization = %format!("Bearer {}", redact_token(token)));
                req.bearer_auth(token)
            }
            None => req,
        };

        let resp = req
            .send()
            .await
            .map_err(|e| HttpError::transport(e.to_string()))?;

        let status = resp.status();
        let status_code = status.as_u16();
        tracing::debug!(status = status_code, "response status");

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| HttpError::with_status(status_code, e.to_string()))?
            .to_vec();

        tracing::debug!(body = %String::from_utf8_lossy(&bytes), "response body");

        if !status.is_success() {
            return Err(HttpError::with_status(
                status_code,
                String::from_utf8_lossy(&bytes).to_string(),
            ));
        }

        Ok(bytes)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, HttpError> {
        tracing::debug!(url, body = %String::from_utf8_lossy(&body), "POST");
        let req = self
            .inner
            .post(url)
            .header("content-type", "application/json")
            .body(body);
        self.execute(req).await
    }

    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        tracing::debug!(url, "GET");
        self.execute(self.inner.get(url)).await
    }
}
