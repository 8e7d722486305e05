// Configuration type definitions

use serde::Deserialize;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const HUGGINGFACE_API_URL: &str = "https://api-inference.huggingface.co/models";

pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
pub const HUGGINGFACE_KEY_ENV: &str = "HUGGINGFACE_API_TOKEN";

/// Chat provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(name = "openai")]
    OpenAi,
    #[default]
    Gemini,
    #[value(name = "huggingface")]
    HuggingFace,
}

impl ProviderKind {
    /// Human-readable provider name used in messages and errors
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::HuggingFace => "Hugging Face",
        }
    }

    /// What the credential is called in user-facing messages
    pub fn credential_name(&self) -> &'static str {
        match self {
            ProviderKind::HuggingFace => "API token",
            _ => "API key",
        }
    }
}

/// Pick the configured key, or fall back to an environment variable
///
/// Blank values count as missing.
pub fn resolve_api_key<F>(configured: Option<&str>, env_var: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string)
        .or_else(|| lookup(env_var))
        .filter(|key| !key.trim().is_empty())
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// General chat behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub provider: ProviderKind,
    /// Cap on user/assistant messages forwarded to the provider
    pub max_messages: usize,
    /// Ask the model for follow-up suggestions
    pub suggestions: bool,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        ChatConfig {
            provider: ProviderKind::Gemini,
            max_messages: 15,
            suggestions: true,
            timeout_secs: 30,
        }
    }
}

/// `[openai]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Model used by the theme generator
    pub theme_model: String,
    pub base_url: String,
    pub temperature: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            theme_model: "gpt-4o".to_string(),
            base_url: OPENAI_API_URL.to_string(),
            temperature: 0.7,
        }
    }
}

impl OpenAiConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), OPENAI_KEY_ENV, env_lookup)
    }
}

/// `[gemini]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: "gemini-1.5-flash-latest".to_string(),
            base_url: GEMINI_API_URL.to_string(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

impl GeminiConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), GEMINI_KEY_ENV, env_lookup)
    }
}

/// `[huggingface]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HuggingFaceConfig {
    pub api_token: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        HuggingFaceConfig {
            api_token: None,
            model: "meta-llama/Llama-2-7b-chat-hf".to_string(),
            base_url: HUGGINGFACE_API_URL.to_string(),
            max_new_tokens: 250,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl HuggingFaceConfig {
    pub fn resolved_api_token(&self) -> Option<String> {
        resolve_api_key(self.api_token.as_deref(), HUGGINGFACE_KEY_ENV, env_lookup)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
}
