//! Client for the generative text endpoint behind `/api/generate`.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Upstream returned {status}")]
    Status { status: u16, details: String },

    #[error("Upstream request failed: {0}")]
    Request(String),

    #[error("Upstream returned invalid JSON: {0}")]
    InvalidBody(String),
}

/// Something that turns a prompt into the upstream's raw JSON reply.
#[async_trait]
pub trait GenerativeUpstream: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<serde_json::Value, UpstreamError>;
}

/// Forwards prompts over HTTP with a bearer credential.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    url: String,
    api_key: String,
    max_output_tokens: u32,
}

impl HttpUpstream {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            max_output_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamRequest<'a> {
    prompt: PromptText<'a>,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct PromptText<'a> {
    text: &'a str,
}

#[async_trait]
impl GenerativeUpstream for HttpUpstream {
    async fn generate(&self, prompt: &str) -> Result<serde_json::Value, UpstreamError> {
        let body = UpstreamRequest {
            prompt: PromptText { text: prompt },
            max_output_tokens: self.max_output_tokens,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                details: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| UpstreamError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = UpstreamRequest {
            prompt: PromptText { text: "hello" },
            max_output_tokens: 300,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"prompt": {"text": "hello"}, "maxOutputTokens": 300})
        );
    }
}
