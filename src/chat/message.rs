//! Conversation messages and request validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =========================================================================
// Message Types
// =========================================================================

/// Who is speaking in a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single turn of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Inbound chat request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
}

/// Reasons a chat request is rejected before any provider call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("Invalid JSON in request body: {0}")]
    InvalidJson(String),

    #[error("Messages are required, must be a non-empty array")]
    EmptyConversation,

    #[error("System message must be the first message (found at position {index})")]
    MisplacedSystemMessage { index: usize },

    #[error(
        "No valid user or assistant messages to process after handling system instruction."
    )]
    NoTurns,
}

// =========================================================================
// Preparation
// =========================================================================

/// A validated conversation ready to be turned into a provider payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedConversation {
    /// Content of the leading system message
    pub system: Option<String>,
    /// User and assistant turns, oldest first, after capping
    pub turns: Vec<ConversationMessage>,
}

impl PreparedConversation {
    /// Build a one-shot conversation from a system prompt and a user message
    pub fn single_turn(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            turns: vec![ConversationMessage::user(user)],
        }
    }

    /// Append extra instructions to the system prompt, creating it if absent
    pub fn append_system_instructions(&mut self, instructions: &str) {
        self.system = Some(match self.system.take() {
            Some(system) if !system.trim().is_empty() => {
                format!("{}\n\n{}", system.trim_end(), instructions)
            }
            _ => instructions.to_string(),
        });
    }

    /// The most recent turn, if any
    pub fn last_turn(&self) -> Option<&ConversationMessage> {
        self.turns.last()
    }
}

/// Validate a conversation and keep only the most recent turns
///
/// The system message, when present, must be the first one and is never
/// counted against `max_turns`.
pub fn prepare_conversation(
    messages: &[ConversationMessage],
    max_turns: usize,
) -> Result<PreparedConversation, ChatError> {
    if messages.is_empty() {
        return Err(ChatError::EmptyConversation);
    }

    if let Some(index) = messages
        .iter()
        .skip(1)
        .position(|m| m.role == Role::System)
    {
        return Err(ChatError::MisplacedSystemMessage { index: index + 1 });
    }

    let (system, turns) = match messages.split_first() {
        Some((first, rest)) if first.role == Role::System => (Some(first.content.clone()), rest),
        _ => (None, messages),
    };

    let skip = turns.len().saturating_sub(max_turns);
    if skip > 0 {
        log::debug!(
            "Dropping {} oldest messages (capped at {} user/assistant messages)",
            skip,
            max_turns
        );
    }
    let turns: Vec<ConversationMessage> = turns[skip..].to_vec();

    if turns.is_empty() && system.is_none() {
        return Err(ChatError::NoTurns);
    }

    Ok(PreparedConversation { system, turns })
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod message_tests;
