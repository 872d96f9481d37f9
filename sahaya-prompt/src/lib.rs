mod error;
mod instruction;
mod payload;
mod template;

pub use error::PromptError;
pub use instruction::{SystemInstruction, DEFAULT_SYSTEM_INSTRUCTION};
pub use payload::{PromptPayload, CONTEXT_MARKER, QUESTION_MARKER, RAG_PROMPT_TEMPLATE};
pub use template::PromptTemplate;
