//! Chat proxy and response normalizer
//!
//! The normalizer splits a model completion into the answer and up to two
//! follow-up suggestions. Around it sit the provider clients, the chat
//! request service and the theme generator.

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod theme;

pub use config::Config;
pub use error::{AppError, Result};
pub use normalize::{NormalizedResponse, normalize};
pub use provider::Provider;
pub use service::ChatService;
pub use theme::ThemeGenerator;
