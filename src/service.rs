//! Chat request handling
//!
//! Takes an inbound chat request, forwards the capped conversation to the
//! configured provider and shapes the outward payload: the normalized answer
//! with its follow-up suggestions, or an error body with a user-facing
//! fallback message.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::chat::prompt::{SUGGESTION_INSTRUCTIONS, preview};
use crate::chat::{ChatError, ChatRequest, Role, prepare_conversation};
use crate::config::{Config, ProviderKind};
use crate::normalize::normalize;
use crate::provider::{AiError, Provider};

/// Shown to the user whenever the provider call fails
pub const PROVIDER_FAILURE_MESSAGE: &str =
    "Sorry, I encountered an error while processing your request. Please try again later.";

/// Reply text used when OpenAI returns an empty message
pub const OPENAI_EMPTY_CONTENT: &str = "No response content";

/// Status reported for requests cancelled by the caller
pub const STATUS_CANCELLED: u16 = 499;

/// Assistant message included in outward payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantMessage {
    pub role: Role,
    pub content: String,
}

impl AssistantMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Successful chat response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub message: AssistantMessage,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatFailure {
    /// HTTP-style status code; not part of the body
    #[serde(skip)]
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<AssistantMessage>,
}

impl ChatFailure {
    pub fn bad_request(error: &ChatError) -> Self {
        Self {
            status: 400,
            error: error.to_string(),
            details: None,
            message: None,
        }
    }

    /// Build the failure body for a provider error
    pub fn from_ai_error(kind: ProviderKind, error: &AiError) -> Self {
        let name = kind.display_name();

        match error {
            AiError::NotConfigured { .. } => Self {
                status: 500,
                error: format!("{} {} is not configured", name, kind.credential_name()),
                details: Some(error.to_string()),
                message: Some(AssistantMessage::new(format!(
                    "Sorry, the {name} {credential} is not configured. Please add your {credential} to the environment variables.",
                    credential = kind.credential_name()
                ))),
            },
            AiError::Api { code, message, .. } => Self {
                // Gemini's status is passed through, the other routes report 500
                status: match kind {
                    ProviderKind::Gemini => *code,
                    _ => 500,
                },
                error: format!("{} API error: {}", name, code),
                details: Some(message.clone()),
                message: Some(AssistantMessage::new(PROVIDER_FAILURE_MESSAGE)),
            },
            AiError::Cancelled => Self {
                status: STATUS_CANCELLED,
                error: error.to_string(),
                details: None,
                message: None,
            },
            AiError::Network { message, .. } | AiError::Parse { message, .. } => Self {
                status: 500,
                error: format!("Failed to get response from {}", name),
                details: Some(message.clone()),
                message: Some(AssistantMessage::new(PROVIDER_FAILURE_MESSAGE)),
            },
        }
    }
}

/// Chat request handler bound to a configuration
#[derive(Debug, Clone)]
pub struct ChatService {
    config: Config,
    provider: ProviderKind,
}

impl ChatService {
    /// Create a service using the provider selected in `config`
    pub fn new(config: Config) -> Self {
        let provider = config.chat.provider;
        Self { config, provider }
    }

    /// Override the provider selected in the config
    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Handle a raw JSON request body
    pub async fn handle_json(
        &self,
        body: &str,
        cancel: CancellationToken,
    ) -> Result<ChatReply, ChatFailure> {
        let request: ChatRequest = serde_json::from_str(body).map_err(|e| {
            log::debug!("Rejecting request body: {}", e);
            ChatFailure::bad_request(&ChatError::InvalidJson(e.to_string()))
        })?;

        self.handle(request, cancel).await
    }

    /// Handle a parsed request
    pub async fn handle(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<ChatReply, ChatFailure> {
        let mut conversation =
            prepare_conversation(&request.messages, self.config.chat.max_messages)
                .map_err(|e| ChatFailure::bad_request(&e))?;

        let provider = Provider::from_config(self.provider, &self.config).map_err(|e| {
            log::error!("{}", e);
            ChatFailure::from_ai_error(self.provider, &e)
        })?;

        if self.config.chat.suggestions {
            conversation.append_system_instructions(SUGGESTION_INSTRUCTIONS);
        }

        log::info!(
            "Sending request to {}. System instruction: {}. History messages: {} (capped at {} user/assistant messages)",
            self.provider.display_name(),
            conversation
                .system
                .as_deref()
                .map_or_else(|| "None".to_string(), |system| preview(system, 50)),
            conversation.turns.len(),
            self.config.chat.max_messages
        );
        if let Some(last) = conversation.last_turn() {
            log::debug!("Last message: {}", preview(&last.content, 100));
        }

        let completion = provider
            .complete(&conversation, cancel)
            .await
            .map_err(|e| {
                log::error!("{}", e);
                ChatFailure::from_ai_error(self.provider, &e)
            })?;

        let text = if self.provider == ProviderKind::OpenAi && completion.text.trim().is_empty() {
            OPENAI_EMPTY_CONTENT
        } else {
            completion.text.as_str()
        };

        let normalized = normalize(text);
        log::debug!(
            "Normalized reply with {} suggestions",
            normalized.suggestions.len()
        );

        Ok(ChatReply {
            message: AssistantMessage::new(normalized.main_content),
            suggestions: normalized.suggestions,
            model: Some(completion.model),
            raw_response: completion.raw_response,
        })
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
