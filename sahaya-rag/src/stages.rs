//! Typed values passed between pipeline stages.

use sahaya_core::RetrievedPassage;

use crate::RagError;

pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// A message that passed validation. The raw text is kept untouched;
/// only the emptiness check trims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserMessage(String);

impl UserMessage {
    pub fn parse(message: &str) -> Result<Self, RagError> {
        if message.trim().is_empty() {
            return Err(RagError::InvalidInput);
        }
        Ok(Self(message.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryEmbedding(pub Vec<f32>);

impl QueryEmbedding {
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedContext {
    pub passages: Vec<RetrievedPassage>,
    pub text: String,
}

impl RetrievedContext {
    pub fn from_passages(passages: Vec<RetrievedPassage>) -> Self {
        let text = join_context(&passages);
        Self { passages, text }
    }
}

/// Joins passage texts in the order the index returned them.
pub fn join_context(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(|passage| passage.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatAnswer {
    pub answer: String,
}
