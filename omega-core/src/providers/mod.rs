//! Reasoning runtime integration

pub mod ollama;
pub mod traits;

pub use ollama::OllamaProvider;
pub use traits::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};
