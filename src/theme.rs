//! AI-assisted theme generation
//!
//! Turns a free-text description into CSS custom properties using an OpenAI
//! chat completion. Without an OpenAI key an example stylesheet is returned
//! so the caller can still render something.

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::chat::PreparedConversation;
use crate::chat::prompt::{THEME_SYSTEM_PROMPT, build_theme_prompt, example_theme_css};
use crate::config::{Config, ProviderKind};
use crate::error::{AppError, Result};
use crate::provider::{OpenAiClient, build_http_client};

/// Returned when the model answers with nothing
const EMPTY_CSS: &str = "/* No CSS generated */";

/// Lightness shift applied to background/foreground values in `.dark`
const DARK_LIGHTNESS_SHIFT: f64 = 40.0;

/// Theme generator response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeReply {
    pub css: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_example: bool,
}

/// Generates CSS themes through the OpenAI API
#[derive(Debug, Clone)]
pub struct ThemeGenerator {
    config: Config,
}

impl ThemeGenerator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Generate CSS variables for `description`
    pub async fn generate(&self, description: &str, cancel: CancellationToken) -> Result<ThemeReply> {
        if description.trim().is_empty() {
            return Err(AppError::MissingPrompt);
        }

        let Some(api_key) = self.config.openai.resolved_api_key() else {
            log::info!("No OpenAI API key provided, returning example CSS");
            return Ok(ThemeReply {
                css: example_theme_css(description),
                is_example: true,
            });
        };

        let http = build_http_client(ProviderKind::OpenAi, self.config.chat.timeout_secs)?;
        let client = OpenAiClient::new(api_key, self.config.openai.theme_model.clone())
            .with_base_url(&self.config.openai.base_url)
            .with_temperature(self.config.openai.temperature)
            .with_http_client(http);

        let conversation =
            PreparedConversation::single_turn(THEME_SYSTEM_PROMPT, build_theme_prompt(description));

        log::info!("Generating theme with {}", client.model());
        let completion = client.complete(&conversation, cancel).await?;

        let css = if completion.text.trim().is_empty() {
            EMPTY_CSS.to_string()
        } else {
            completion.text
        };

        Ok(ThemeReply {
            css,
            is_example: false,
        })
    }
}

/// Render theme values as `:root` and `.dark` custom property blocks
///
/// In the dark block `*background*` values are darkened and `*foreground*`
/// values lightened; other values are copied unchanged.
pub fn css_variables(theme: &[(&str, &str)]) -> String {
    let mut css = String::from(":root {\n");
    for (name, value) in theme {
        css.push_str(&format!("  --{}: {};\n", name, value));
    }

    css.push_str("}\n\n.dark {\n");
    for (name, value) in theme {
        let value = if name.contains("background") {
            shift_lightness(value, -DARK_LIGHTNESS_SHIFT)
        } else if name.contains("foreground") {
            shift_lightness(value, DARK_LIGHTNESS_SHIFT)
        } else {
            value.to_string()
        };
        css.push_str(&format!("  --{}: {};\n", name, value));
    }
    css.push('}');

    css
}

/// Shift the lightness of an `H S% L%` value, clamped to 0..=100
///
/// Values in any other format are returned as-is.
pub fn shift_lightness(value: &str, delta: f64) -> String {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [hue, saturation, lightness] = parts.as_slice() else {
        return value.to_string();
    };

    let Some(current) = lightness
        .strip_suffix('%')
        .and_then(|l| l.parse::<f64>().ok())
    else {
        return value.to_string();
    };

    let shifted = ((current + delta).clamp(0.0, 100.0) * 10.0).round() / 10.0;
    format!("{} {} {}%", hue, saturation, shifted)
}

#[cfg(test)]
#[path = "theme_tests.rs"]
mod theme_tests;
