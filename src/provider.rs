//! Chat provider abstraction
//!
//! Defines the Provider enum, AiError types, and the HTTP plumbing shared
//! by the vendor clients.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::chat::PreparedConversation;
use crate::chat::prompt::preview;
use crate::config::{Config, GEMINI_KEY_ENV, HUGGINGFACE_KEY_ENV, OPENAI_KEY_ENV, ProviderKind};

mod gemini;
mod huggingface;
mod openai;

pub use gemini::{GeminiClient, GenerationConfig};
pub use huggingface::{HuggingFaceClient, HuggingFaceParameters, clean_response, format_prompt};
pub use openai::OpenAiClient;

/// Errors that can occur while talking to a provider
#[derive(Debug, Error)]
pub enum AiError {
    /// Provider is not configured (missing API key)
    #[error("[{provider}] AI not configured: {message}")]
    NotConfigured { provider: String, message: String },

    /// Network error during API request
    #[error("[{provider}] Network error: {message}")]
    Network { provider: String, message: String },

    /// API returned an error response
    #[error("[{provider}] API error ({code}): {message}")]
    Api {
        provider: String,
        code: u16,
        message: String,
    },

    /// Failed to parse API response
    #[error("[{provider}] Parse error: {message}")]
    Parse { provider: String, message: String },

    /// Request was cancelled
    #[error("Request cancelled")]
    Cancelled,
}

impl AiError {
    pub(crate) fn network(provider: &str, message: impl ToString) -> Self {
        AiError::Network {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn parse(provider: &str, message: impl ToString) -> Self {
        AiError::Parse {
            provider: provider.to_string(),
            message: message.to_string(),
        }
    }

    /// Provider name carried by the error, if any
    pub fn provider(&self) -> Option<&str> {
        match self {
            AiError::NotConfigured { provider, .. }
            | AiError::Network { provider, .. }
            | AiError::Api { provider, .. }
            | AiError::Parse { provider, .. } => Some(provider),
            AiError::Cancelled => None,
        }
    }
}

/// Provider output reduced to a single string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub model: String,
    /// Truncated provider JSON, for debugging
    pub raw_response: Option<String>,
}

/// Chat provider implementations
#[derive(Debug)]
pub enum Provider {
    OpenAi(OpenAiClient),
    Gemini(GeminiClient),
    HuggingFace(HuggingFaceClient),
}

impl Provider {
    /// Create a provider from configuration
    ///
    /// Returns `AiError::NotConfigured` when no key is set in the config
    /// file or the provider's environment variable.
    pub fn from_config(kind: ProviderKind, config: &Config) -> Result<Self, AiError> {
        let http = build_http_client(kind, config.chat.timeout_secs)?;

        match kind {
            ProviderKind::OpenAi => {
                let api_key = config
                    .openai
                    .resolved_api_key()
                    .ok_or_else(|| missing_key(kind, OPENAI_KEY_ENV))?;

                Ok(Provider::OpenAi(
                    OpenAiClient::new(api_key, config.openai.model.clone())
                        .with_base_url(&config.openai.base_url)
                        .with_temperature(config.openai.temperature)
                        .with_http_client(http),
                ))
            }
            ProviderKind::Gemini => {
                let api_key = config
                    .gemini
                    .resolved_api_key()
                    .ok_or_else(|| missing_key(kind, GEMINI_KEY_ENV))?;

                Ok(Provider::Gemini(
                    GeminiClient::new(api_key, config.gemini.model.clone())
                        .with_base_url(&config.gemini.base_url)
                        .with_generation_config(GenerationConfig::from(&config.gemini))
                        .with_http_client(http),
                ))
            }
            ProviderKind::HuggingFace => {
                let api_token = config
                    .huggingface
                    .resolved_api_token()
                    .ok_or_else(|| missing_key(kind, HUGGINGFACE_KEY_ENV))?;

                Ok(Provider::HuggingFace(
                    HuggingFaceClient::new(api_token, config.huggingface.model.clone())
                        .with_base_url(&config.huggingface.base_url)
                        .with_parameters(HuggingFaceParameters::from(&config.huggingface))
                        .with_http_client(http),
                ))
            }
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::OpenAi(_) => ProviderKind::OpenAi,
            Provider::Gemini(_) => ProviderKind::Gemini,
            Provider::HuggingFace(_) => ProviderKind::HuggingFace,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAi(client) => client.model(),
            Provider::Gemini(client) => client.model(),
            Provider::HuggingFace(client) => client.model(),
        }
    }

    /// Send a conversation and wait for the complete reply
    pub async fn complete(
        &self,
        conversation: &PreparedConversation,
        cancel: CancellationToken,
    ) -> Result<Completion, AiError> {
        match self {
            Provider::OpenAi(client) => client.complete(conversation, cancel).await,
            Provider::Gemini(client) => client.complete(conversation, cancel).await,
            Provider::HuggingFace(client) => client.complete(conversation, cancel).await,
        }
    }
}

fn missing_key(kind: ProviderKind, env_var: &str) -> AiError {
    AiError::NotConfigured {
        provider: kind.display_name().to_string(),
        message: format!(
            "Missing {}. Set it in the config file or the {} environment variable",
            kind.credential_name(),
            env_var
        ),
    }
}

pub(crate) fn build_http_client(kind: ProviderKind, timeout_secs: u64) -> Result<reqwest::Client, AiError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AiError::network(kind.display_name(), e))
}

/// Race a request against cancellation
///
/// An already-cancelled token short-circuits before the request starts.
pub(crate) async fn with_cancel<T, F>(cancel: &CancellationToken, request: F) -> Result<T, AiError>
where
    F: Future<Output = Result<T, AiError>>,
{
    if cancel.is_cancelled() {
        return Err(AiError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AiError::Cancelled),
        result = request => result,
    }
}

/// Send a request and decode the JSON body
///
/// Non-2xx statuses become `AiError::Api` carrying the response text.
/// Transport errors drop the request URL, which may carry credentials.
pub(crate) async fn send_json(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, AiError> {
    let response = request
        .send()
        .await
        .map_err(|e| AiError::network(provider, e.without_url()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AiError::network(provider, e.without_url()))?;

    if !status.is_success() {
        log::error!("{} API error: {} {}", provider, status, preview(&body, 200));
        return Err(AiError::Api {
            provider: provider.to_string(),
            code: status.as_u16(),
            message: body,
        });
    }

    serde_json::from_str(&body).map_err(|e| AiError::parse(provider, e))
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
