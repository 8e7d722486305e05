//! Hugging Face inference client
//!
//! Text-generation models take a single prompt string, so the conversation
//! is flattened into the Llama-2 chat template:
//!
//! ```text
//! <s>[INST] <<SYS>>
//! system prompt
//! <</SYS>>
//!
//! first question [/INST] first answer </s><s>[INST] next question [/INST]
//! ```

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{AiError, Completion, send_json, with_cancel};
use crate::chat::{ConversationMessage, PreparedConversation, Role};
use crate::config::{HUGGINGFACE_API_URL, HuggingFaceConfig};

const PROVIDER: &str = "Hugging Face";

/// Generation parameters for the inference endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HuggingFaceParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub do_sample: bool,
}

impl Default for HuggingFaceParameters {
    fn default() -> Self {
        HuggingFaceParameters::from(&HuggingFaceConfig::default())
    }
}

impl From<&HuggingFaceConfig> for HuggingFaceParameters {
    fn from(config: &HuggingFaceConfig) -> Self {
        HuggingFaceParameters {
            max_new_tokens: config.max_new_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            do_sample: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: HuggingFaceParameters,
}

/// Flatten a conversation into a Llama-2 chat prompt
pub fn format_prompt(system: Option<&str>, turns: &[ConversationMessage]) -> String {
    let mut prompt = match system {
        Some(system) => format!("<s>[INST] <<SYS>>\n{}\n<</SYS>>\n\n", system),
        None => "<s>[INST] ".to_string(),
    };

    let last = turns.len().saturating_sub(1);
    let mut previous = None;
    for (i, message) in turns.iter().enumerate() {
        // Back-to-back user turns share one [INST] section
        if message.role == Role::User && previous == Some(Role::User) {
            prompt.push('\n');
        }
        previous = Some(message.role);

        match message.role {
            Role::User if i == last => {
                prompt.push_str(&message.content);
                prompt.push_str(" [/INST]");
            }
            Role::User => prompt.push_str(&message.content),
            Role::Assistant => {
                prompt.push_str(" [/INST] ");
                prompt.push_str(&message.content);
                prompt.push_str(" </s><s>[INST] ");
            }
            Role::System => {}
        }
    }

    prompt
}

/// Strip the echoed prompt and template tokens from generated text
pub fn clean_response(response: &str, prompt: &str) -> String {
    let response = response.strip_prefix(prompt).unwrap_or(response);
    let response = response.replace("[/INST]", "");
    let response = response.trim();

    let lower = response.to_ascii_lowercase();
    let response = ["assistant:", "ai:"]
        .iter()
        .find(|prefix| lower.starts_with(*prefix))
        .map_or(response, |prefix| &response[prefix.len()..]);

    response.trim().to_string()
}

/// Pull the generated text out of the response, whose shape varies by model
fn extract_generated_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .first()
            .and_then(|item| item.get("generated_text"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::Object(map) => match map.get("generated_text").and_then(Value::as_str) {
            Some(text) => text.to_string(),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}

/// Hugging Face inference API client
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    http: reqwest::Client,
    api_token: String,
    model: String,
    base_url: String,
    parameters: HuggingFaceParameters,
}

impl HuggingFaceClient {
    /// Create a new client against the public inference endpoint
    pub fn new(api_token: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token,
            model,
            base_url: HUGGINGFACE_API_URL.to_string(),
            parameters: HuggingFaceParameters::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_parameters(mut self, parameters: HuggingFaceParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_url(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }

    pub fn build_request_body(&self, prompt: &str) -> Result<String, AiError> {
        let request = InferenceRequest {
            inputs: prompt,
            parameters: self.parameters,
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
        let prompt = format_prompt(conversation.system.as_deref(), &conversation.turns);
        let body = self.build_request_body(&prompt)?;

        let request = self
            .http
            .post(self.build_url())
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let json = send_json(PROVIDER, request).await?;
        let generated = extract_generated_text(&json);

        Ok(Completion {
            text: clean_response(&generated, &prompt),
            model: self.model.clone(),
            raw_response: None,
        })
    }
}

#[cfg(test)]
#[path = "huggingface_tests.rs"]
mod huggingface_tests;
