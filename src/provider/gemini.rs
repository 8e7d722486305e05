//! Google Gemini `generateContent` client

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::{AiError, Completion, send_json, with_cancel};
use crate::chat::prompt::preview;
use crate::chat::{PreparedConversation, Role};
use crate::config::{GEMINI_API_URL, GeminiConfig};

const PROVIDER: &str = "Gemini";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// How much of the provider JSON is echoed back for debugging
const RAW_RESPONSE_CHARS: usize = 500;

/// Sampling parameters sent with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig::from(&GeminiConfig::default())
    }
}

impl From<&GeminiConfig> for GenerationConfig {
    fn from(config: &GeminiConfig) -> Self {
        GenerationConfig {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    // Omitted for systemInstruction
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate every text part of the first candidate
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    generation_config: GenerationConfig,
}

impl GeminiClient {
    /// Create a new Gemini client against the public endpoint
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url: GEMINI_API_URL.to_string(),
            generation_config: GenerationConfig::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_generation_config(mut self, generation_config: GenerationConfig) -> Self {
        self.generation_config = generation_config;
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

    /// Endpoint URL; the key travels in the `x-goog-api-key` header
    pub fn build_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the JSON request body
    ///
    /// The system prompt travels as `systemInstruction`; assistant turns are
    /// sent with the `model` role.
    pub fn build_request_body(&self, conversation: &PreparedConversation) -> Result<String, AiError> {
        let contents = conversation
            .turns
            .iter()
            .filter_map(|message| {
                let role = match message.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                    Role::System => return None,
                };
                Some(Content {
                    role: Some(role),
                    parts: vec![Part {
                        text: &message.content,
                    }],
                })
            })
            .collect();

        let system_instruction = conversation.system.as_deref().map(|system| Content {
            role: None,
            parts: vec![Part { text: system }],
        });

        let request = GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: self.generation_config,
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
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let json = send_json(PROVIDER, request).await?;
        let raw = json.to_string();
        log::debug!("Gemini API response: {}", preview(&raw, 200));

        let response: GenerateContentResponse =
            serde_json::from_value(json).map_err(|e| AiError::parse(PROVIDER, e))?;

        let text = response.text();
        if text.is_empty() {
            log::error!("Failed to extract text from Gemini response: {}", preview(&raw, 500));
        }

        Ok(Completion {
            text,
            model: self.model.clone(),
            raw_response: Some(raw.chars().take(RAW_RESPONSE_CHARS).collect()),
        })
    }
}

#[cfg(test)]
#[path = "gemini_tests.rs"]
mod gemini_tests;
