use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
    #[error("failed to read system instruction from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("system instruction is empty")]
    EmptyInstruction,
}
