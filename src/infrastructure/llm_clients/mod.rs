pub mod gateway;

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::domain::error::InferenceError;

/// Status and raw body of a provider response, before any decoding.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

impl TransportReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Narrow outbound-HTTP capability, swappable for a stub in tests.
///
/// One call per invocation; retries and fallbacks are nobody's job here.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &Value,
    ) -> Result<TransportReply, InferenceError>;
}

/// reqwest-backed transport with a per-request deadline.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: &Value,
    ) -> Result<TransportReply, InferenceError> {
        let payload =
            serde_json::to_vec(body).map_err(|e| InferenceError::RequestBuild(e.to_string()))?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        Ok(TransportReply { status, body })
    }
}
