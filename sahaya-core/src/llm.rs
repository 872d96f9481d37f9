use async_trait::async_trait;

use crate::GenerationError;

/// Single-shot text generation. No conversation history is carried between
/// calls; every prompt stands alone.
#[async_trait]
pub trait Llm: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
