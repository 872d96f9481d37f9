//! Retrieval-augmented chat orchestration.
//!
//! One chat turn runs five stages in order:
//! validate -> embed -> retrieve -> compose -> generate.
//! Each stage consumes the typed output of the previous one, so any of them
//! can be driven on its own. [`ChatOrchestrator::handle`] runs the whole
//! pipeline and is the boundary where upstream failures are logged.

mod error;
mod orchestrator;
pub mod stages;

pub use error::{RagError, Stage};
pub use orchestrator::{
    ChatOrchestrator, ChatOrchestratorBuilder, DEFAULT_TOP_K, DEFAULT_UPSTREAM_TIMEOUT,
};
pub use stages::{ChatAnswer, QueryEmbedding, RetrievedContext, UserMessage};
