mod error;
mod google;

pub use error::EmbeddingProviderError;
pub use google::{GoogleEmbedding, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL};
