use async_trait::async_trait;
use sahaya_core::{RetrievedPassage, Retriever, StoreError};
use serde_json::{Map, Value};
use tracing::Instrument;

use crate::client::PineconeHttpClient;
use crate::config::PineconeRetrieverBuilder;
use crate::mapper::match_to_passage;
use crate::types::{IndexStatsResponse, QueryRequest, QueryResponse};
use crate::PineconeStoreError;

pub struct PineconeRetriever {
    pub(crate) client: PineconeHttpClient,
    pub(crate) index_name: Option<String>,
    pub(crate) namespace: Option<String>,
    pub(crate) text_key: String,
}

impl PineconeRetriever {
    pub fn builder() -> PineconeRetrieverBuilder {
        PineconeRetrieverBuilder::new()
    }

    pub(crate) fn new(
        client: PineconeHttpClient,
        index_name: Option<String>,
        namespace: Option<String>,
        text_key: String,
    ) -> Self {
        Self {
            client,
            index_name,
            namespace,
            text_key,
        }
    }

    pub fn text_key(&self) -> &str {
        &self.text_key
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn host(&self) -> &str {
        self.client.base_url()
    }

    pub(crate) async fn validate_dimension_on_init(&self, expected: usize) {
        let response = self
            .client
            .post_typed::<_, IndexStatsResponse>("/describe_index_stats", &Value::Object(Map::new()))
            .await;

        match response {
            Ok(stats) => match stats.dimension {
                Some(index_dim) if index_dim != expected => {
                    tracing::warn!(
                        index_name = ?self.index_name,
                        namespace = ?self.namespace,
                        index_dim,
                        embedder_dim = expected,
                        "embedder dimension differs from pinecone index dimension"
                    );
                }
                Some(_) => {}
                None => {
                    tracing::warn!("pinecone describe_index_stats response missing 'dimension'");
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "failed to validate pinecone index dimension");
            }
        }
    }
}

#[async_trait]
impl Retriever for PineconeRetriever {
    async fn retrieve(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>, StoreError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let span = tracing::info_span!(
            "pinecone_query",
            namespace = ?self.namespace,
            top_k,
            text_key = %self.text_key,
        );

        async {
            let request = QueryRequest {
                vector: query_embedding,
                top_k,
                include_metadata: true,
                namespace: self.namespace.as_deref(),
            };

            let response: QueryResponse = self
                .client
                .post_typed_with_context("/query", &request, self.namespace.as_deref())
                .await?;

            let passages = response
                .matches
                .iter()
                .enumerate()
                .map(|(rank, m)| {
                    match_to_passage(&m.id, m.score, rank, m.metadata.as_ref(), &self.text_key)
                })
                .collect::<Result<Vec<_>, _>>()?;

            tracing::debug!(matches = passages.len(), "pinecone query complete");
            Ok::<_, PineconeStoreError>(passages)
        }
        .instrument(span)
        .await
        .map_err(StoreError::from)
    }
}
