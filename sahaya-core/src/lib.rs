//! Seams between the chat pipeline and the hosted services it sequences.
//!
//! The embedding model, the vector index and the generative model are all
//! remote. Each one is reached through a trait defined here so the
//! orchestrator can be driven by real HTTP clients in production and by
//! in-process fakes in tests.

mod embedding;
mod error;
mod llm;
mod retriever;

pub use embedding::Embedding;
pub use error::{EmbeddingError, GenerationError, StoreError};
pub use llm::Llm;
pub use retriever::{RetrievedPassage, Retriever};
