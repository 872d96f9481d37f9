use std::fmt;

use sahaya_prompt::PromptError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Embed,
    Retrieve,
    Compose,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validate => "validate",
            Stage::Embed => "embed",
            Stage::Retrieve => "retrieve",
            Stage::Compose => "compose",
            Stage::Generate => "generate",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("message is required")]
    InvalidInput,
    /// A hosted service failed, timed out, or answered with something
    /// unusable.
    #[error("{stage} failed: {detail}")]
    Upstream { stage: Stage, detail: String },
    #[error("internal error during {stage}: {detail}")]
    Internal { stage: Stage, detail: String },
}

impl RagError {
    pub(crate) fn upstream(stage: Stage, detail: impl fmt::Display) -> Self {
        RagError::Upstream {
            stage,
            detail: detail.to_string(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            RagError::InvalidInput => Stage::Validate,
            RagError::Upstream { stage, .. } | RagError::Internal { stage, .. } => *stage,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RagError::InvalidInput)
    }
}

impl From<PromptError> for RagError {
    fn from(err: PromptError) -> Self {
        RagError::Internal {
            stage: Stage::Compose,
            detail: err.to_string(),
        }
    }
}
