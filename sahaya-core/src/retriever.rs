use async_trait::async_trait;

use crate::StoreError;

/// A passage returned by the vector index for one query.
///
/// `rank` is the zero-based position in the index's own similarity ordering.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedPassage {
    pub id: String,
    pub text: String,
    pub rank: usize,
    pub score: f32,
}

#[async_trait]
pub trait Retriever: Send + Sync {
    /// Returns at most `top_k` passages, best match first.
    async fn retrieve(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, StoreError>;
}
