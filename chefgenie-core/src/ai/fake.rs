//! Fake AI client for testing.
//!
//! Returns deterministic responses based on prompt matching, so tests run
//! without network access or API costs.

use std::sync::Mutex;

use async_trait::async_trait;

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, InlineImage, Usage};

/// A fake AI client for testing.
///
/// Text responses are matched by checking if the prompt contains a registered
/// substring (case-insensitive), in registration order. If nothing matches,
/// the default response is returned, or an error if there is none.
#[derive(Debug, Default)]
pub struct FakeAiClient {
    responses: Vec<(String, FakeReply)>,
    default_response: Option<String>,
    image: Option<InlineImage>,
    fail_images: bool,
    prompts: Mutex<Vec<String>>,
}

#[derive(Debug, Clone)]
enum FakeReply {
    Text(String),
    Error(String),
}

impl FakeAiClient {
    /// Create a new FakeAiClient with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a FakeAiClient that answers prompts containing `prompt_contains`.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        Self::new().and_response(prompt_contains, response)
    }

    /// Add a response for prompts containing a specific substring.
    pub fn and_response(mut self, prompt_contains: &str, response: &str) -> Self {
        self.responses.push((
            prompt_contains.to_lowercase(),
            FakeReply::Text(response.to_string()),
        ));
        self
    }

    /// Fail requests whose prompt contains a specific substring.
    pub fn and_error(mut self, prompt_contains: &str, message: &str) -> Self {
        self.responses.push((
            prompt_contains.to_lowercase(),
            FakeReply::Error(message.to_string()),
        ));
        self
    }

    /// Set the default response when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Return this image from every image request.
    pub fn with_image(mut self, mime_type: &str, data: &str) -> Self {
        self.image = Some(InlineImage {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        });
        self
    }

    /// Make every image request fail.
    pub fn with_failing_images(mut self) -> Self {
        self.fail_images = true;
        self
    }

    /// Every prompt seen so far, text and image alike.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn record(&self, prompt: &str) {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let prompt = request.prompt_text();
        self.record(&prompt);

        let prompt_lower = prompt.to_lowercase();
        let matched = self
            .responses
            .iter()
            .find(|(pattern, _)| prompt_lower.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());

        let content = match matched {
            Some(FakeReply::Text(text)) => text,
            Some(FakeReply::Error(message)) => {
                return Err(AiError::Api {
                    status: 500,
                    message,
                })
            }
            None => match &self.default_response {
                Some(text) => text.clone(),
                None => {
                    return Err(AiError::Request(format!(
                        "FakeAiClient: No response configured for {} (first 100 chars): {}",
                        prompt_name,
                        prompt.chars().take(100).collect::<String>()
                    )))
                }
            },
        };

        Ok(ChatResponse {
            content,
            usage: Usage::default(),
        })
    }

    async fn generate_image(
        &self,
        _prompt_name: &str,
        prompt: &str,
    ) -> Result<Option<InlineImage>, AiError> {
        self.record(prompt);
        if self.fail_images {
            return Err(AiError::Api {
                status: 503,
                message: "FakeAiClient: image generation unavailable".to_string(),
            });
        }
        Ok(self.image.clone())
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatMessage;

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(text)],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_fake_client_matching() {
        let client = FakeAiClient::with_response("hello", "world");
        let result = client.complete("test", request("Say hello")).await.unwrap();
        assert_eq!(result.content, "world");
    }

    #[tokio::test]
    async fn test_fake_client_case_insensitive() {
        let client = FakeAiClient::with_response("HELLO", "world");
        let result = client.complete("test", request("hello there")).await.unwrap();
        assert_eq!(result.content, "world");
    }

    #[tokio::test]
    async fn test_fake_client_no_match() {
        let client = FakeAiClient::new();
        assert!(client.complete("test", request("random")).await.is_err());
    }

    #[tokio::test]
    async fn test_fake_client_default_response() {
        let client = FakeAiClient::new().with_default_response("default");
        let result = client.complete("test", request("random")).await.unwrap();
        assert_eq!(result.content, "default");
    }

    #[tokio::test]
    async fn test_fake_client_records_prompts() {
        let client = FakeAiClient::new()
            .with_default_response("ok")
            .with_image("image/png", "AAAA");
        client.complete("test", request("first")).await.unwrap();
        let image = client.generate_image("img", "second").await.unwrap();

        assert_eq!(client.prompts(), vec!["first", "second"]);
        assert_eq!(image.unwrap().mime_type, "image/png");
    }
}
