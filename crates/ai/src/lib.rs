//! Client for the external chat-completion API and the two requests the
//! adoption backend makes with it: photo analysis and profile writing.

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod service;
pub mod types;

pub use client::OpenAiClient;
pub use config::AiConfig;
pub use error::AiError;
pub use provider::CompletionProvider;
pub use service::{AiService, ImageAttachment};
