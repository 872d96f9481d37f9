use std::collections::HashMap;

use crate::{PromptError, PromptTemplate, SystemInstruction};

pub const CONTEXT_MARKER: &str = "\n\nContext: ";
pub const QUESTION_MARKER: &str = "\n\nUser Question: ";

pub const RAG_PROMPT_TEMPLATE: &str =
    "{{instruction}}\n\nContext: {{context}}\n\nUser Question: {{question}}";

/// The single prompt sent to the generative model for one chat turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptPayload {
    text: String,
}

impl PromptPayload {
    pub fn compose(
        instruction: &SystemInstruction,
        context: &str,
        question: &str,
    ) -> Result<Self, PromptError> {
        let vars = HashMap::from([
            ("instruction", instruction.as_str()),
            ("context", context),
            ("question", question),
        ]);
        let text = PromptTemplate::new(RAG_PROMPT_TEMPLATE).render(&vars)?;
        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_string(self) -> String {
        self.text
    }
}
