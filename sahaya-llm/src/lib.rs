// Provider-specific clients
pub mod providers;

pub use providers::google::{GoogleClient, DEFAULT_GENERATION_MODEL};
pub use sahaya_core::{GenerationError, Llm};
