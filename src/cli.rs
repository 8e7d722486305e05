//! Command-line argument parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ProviderKind;

/// Chat proxy and response normalizer
#[derive(Debug, Parser)]
#[command(name = "pm-chat", version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/pm-chat/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split a raw completion into answer and follow-up suggestions
    Normalize {
        /// File holding the raw text (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Send a conversation to a provider and print the reply
    Chat {
        /// Provider to use instead of the configured one
        #[arg(short, long, value_enum)]
        provider: Option<ProviderKind>,

        /// System instruction for a single-message conversation
        #[arg(short, long, requires = "message")]
        system: Option<String>,

        /// User message; starts a new conversation
        #[arg(short, long, conflicts_with = "request")]
        message: Option<String>,

        /// JSON request body with a `messages` array (stdin when neither
        /// this nor --message is given)
        #[arg(short, long, value_name = "FILE")]
        request: Option<PathBuf>,
    },

    /// Generate CSS theme variables from a description
    Theme {
        /// Description of the theme
        prompt: String,
    },
}

impl Cli {
    /// Build the JSON request body for a `chat` invocation from flags
    ///
    /// Returns `None` when the body must be read from a file or stdin.
    pub fn inline_chat_body(system: Option<&str>, message: Option<&str>) -> Option<String> {
        let message = message?;
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": message}));

        Some(serde_json::json!({ "messages": messages }).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_with_provider() {
        let cli = Cli::try_parse_from([
            "pm-chat",
            "chat",
            "--provider",
            "huggingface",
            "--message",
            "Hello",
        ])
        .unwrap();

        match cli.command {
            Command::Chat {
                provider, message, ..
            } => {
                assert_eq!(provider, Some(ProviderKind::HuggingFace));
                assert_eq!(message.as_deref(), Some("Hello"));
            }
            other => panic!("Expected chat command, got {:?}", other),
        }
    }

    #[test]
    fn test_message_conflicts_with_request() {
        let result = Cli::try_parse_from([
            "pm-chat", "chat", "--message", "Hi", "--request", "body.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["pm-chat", "normalize", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn test_inline_chat_body() {
        assert_eq!(Cli::inline_chat_body(Some("sys"), None), None);

        let body = Cli::inline_chat_body(Some("Be brief."), Some("Hi")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Hi");
    }
}
