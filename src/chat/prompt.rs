//! Prompt templates
//!
//! Instructions appended to chat system prompts and the prompts used by the
//! theme generator.

/// Appended to the system instruction so the model ends its answer with a
/// block the normalizer can extract
pub const SUGGESTION_INSTRUCTIONS: &str = "After your answer, suggest exactly two short follow-up questions the user might ask next. \
Put them at the very end of your reply in this exact format:
[SUGGESTIONS]
1. First follow-up question?
2. Second follow-up question?
[/SUGGESTIONS]
Do not mention the block or its markers anywhere else in your reply.";

/// System prompt for the theme generator
pub const THEME_SYSTEM_PROMPT: &str = "You are a CSS expert specializing in theme creation. \
Generate CSS variables for both light and dark themes based on the user's description. \
Use HSL color format. Include variables for background, foreground, primary, secondary, accent, border, etc.";

/// User prompt for the theme generator
pub fn build_theme_prompt(description: &str) -> String {
    format!(
        "Create CSS variables for a theme based on this description: {}. Return only the CSS code without any explanation.",
        description.trim()
    )
}

/// CSS returned when no OpenAI key is configured
pub fn example_theme_css(description: &str) -> String {
    format!(
        "/* Example CSS (OPENAI_API_KEY not configured) */\n\
/* Based on prompt: \"{}\" */\n\n\
:root {{\n  --background: 0 0% 100%;\n  --foreground: 222.2 84% 4.9%;\n  /* other variables... */\n}}",
        description.trim()
    )
}

/// Shorten text for log lines without splitting a character
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod prompt_tests;
