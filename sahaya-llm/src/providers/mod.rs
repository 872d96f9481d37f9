//! Provider-specific LLM clients

pub mod google;
