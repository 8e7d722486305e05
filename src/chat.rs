//! Chat conversation handling
//!
//! This module provides the conversation types shared by every provider,
//! request validation and the prompt templates sent alongside user turns.

pub mod message;
pub mod prompt;

// Re-export main types
pub use message::{
    ChatError, ChatRequest, ConversationMessage, PreparedConversation, Role, prepare_conversation,
};
