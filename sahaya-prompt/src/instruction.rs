use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::PromptError;

/// Persona and policy text prepended to every prompt.
///
/// Versioned alongside the code in `prompts/system_instruction.md`.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = include_str!("../prompts/system_instruction.md");

/// Fixed instruction shared by every request. Cloning is cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct SystemInstruction(Arc<str>);

impl SystemInstruction {
    /// Trailing whitespace is dropped so file-backed instructions compose the
    /// same way as inline ones.
    pub fn new(text: impl AsRef<str>) -> Result<Self, PromptError> {
        let text = text.as_ref().trim_end();
        if text.trim().is_empty() {
            return Err(PromptError::EmptyInstruction);
        }
        Ok(Self(Arc::from(text)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PromptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SystemInstruction {
    fn default() -> Self {
        Self(Arc::from(DEFAULT_SYSTEM_INSTRUCTION.trim_end()))
    }
}

impl fmt::Debug for SystemInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemInstruction")
            .field("len", &self.0.len())
            .finish()
    }
}
