//! OpenAI chat completions client

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{AiError, Completion, send_json, with_cancel};
use crate::chat::PreparedConversation;
use crate::config::OPENAI_API_URL;

const PROVIDER: &str = "OpenAI";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI chat completions client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiClient {
    /// Create a new OpenAI client against the public endpoint
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url: OPENAI_API_URL.to_string(),
            temperature: 0.7,
        }
    }

    /// Point the client at a different API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the JSON request body
    ///
    /// The system prompt, if any, goes first as a `system` message.
    pub fn build_request_body(&self, conversation: &PreparedConversation) -> Result<String, AiError> {
        let mut messages = Vec::with_capacity(conversation.turns.len() + 1);

        if let Some(system) = &conversation.system {
            messages.push(RequestMessage {
                role: "system",
                content: system,
            });
        }

        messages.extend(conversation.turns.iter().map(|message| RequestMessage {
            role: message.role.as_str(),
            content: &message.content,
        }));

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        serde_json::to_string(&request).map_err(|e| AiError::parse(PROVIDER, e))
    }

    /// Request a completion, aborting if `cancel` fires first
    pub async fn complete(
        &self,
        conversation: &PreparedConversation,
        cancel: CancellationToken,
    ) -> Result<Completion, AiError> {
        with_cancel(&cancel, self.send(conversation)).await
    }

    async fn send(&self, conversation: &PreparedConversation) -> Result<Completion, AiError> {
        let body = self.build_request_body(conversation)?;

        let request = self
            .http
            .post(self.build_url())
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let json = send_json(PROVIDER, request).await?;
        let response: ChatCompletionResponse =
            serde_json::from_value(json).map_err(|e| AiError::parse(PROVIDER, e))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::parse(PROVIDER, "response has no choices"))?;

        Ok(Completion {
            text: choice.message.content.unwrap_or_default(),
            model: response.model.unwrap_or_else(|| self.model.clone()),
            raw_response: None,
        })
    }
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod openai_tests;
