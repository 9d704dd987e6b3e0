//! LLM client abstraction.
//!
//! All components that need a language model (intent classification, product
//! extraction, review classification, final analysis) depend on the
//! [`LlmClient`] trait so providers can be swapped and tests can substitute
//! canned responses.

pub mod gemini;

use crate::types::Result;
use async_trait::async_trait;

pub use gemini::{GeminiClient, GeminiConfig};

/// Generic LLM client trait for provider abstraction.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion from a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate a completion with a system instruction.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}
