use std::time::Duration;

use crate::client::PineconeHttpClient;
use crate::retriever::PineconeRetriever;
use crate::types::DescribeIndexResponse;
use crate::PineconeStoreError;

pub const PINECONE_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

pub struct PineconeRetrieverBuilder {
    index_host: Option<String>,
    index_name: Option<String>,
    control_plane_url: String,
    api_key: Option<String>,
    namespace: Option<String>,
    text_key: String,
    timeout: Option<Duration>,
    expected_dimension: Option<usize>,
}

impl Default for PineconeRetrieverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PineconeRetrieverBuilder {
    pub fn new() -> Self {
        Self {
            index_host: None,
            index_name: None,
            control_plane_url: PINECONE_CONTROL_PLANE_URL.to_string(),
            api_key: None,
            namespace: None,
            text_key: "text".to_string(),
            timeout: None,
            expected_dimension: None,
        }
    }

    /// Data plane host of the index. Takes precedence over `index_name`.
    pub fn index_host(mut self, value: impl Into<String>) -> Self {
        self.index_host = Some(value.into());
        self
    }

    /// Index to resolve through the control plane when no host is set.
    pub fn index_name(mut self, value: impl Into<String>) -> Self {
        self.index_name = Some(value.into());
        self
    }

    pub fn control_plane_url(mut self, value: impl Into<String>) -> Self {
        self.control_plane_url = value.into();
        self
    }

    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(value.into());
        self
    }

    pub fn namespace(mut self, value: impl Into<String>) -> Self {
        self.namespace = Some(value.into());
        self
    }

    pub fn text_key(mut self, value: impl Into<String>) -> Self {
        self.text_key = value.into();
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    /// Compare the index dimension with `dimension` after building. A
    /// mismatch is logged, not returned.
    pub fn validate_dimension(mut self, dimension: usize) -> Self {
        self.expected_dimension = Some(dimension);
        self
    }

    pub async fn build(self) -> Result<PineconeRetriever, PineconeStoreError> {
        let api_key = self
            .api_key
            .ok_or_else(|| PineconeStoreError::Config("api_key is required".to_string()))?;
        if self.text_key.trim().is_empty() {
            return Err(PineconeStoreError::Config(
                "text_key cannot be empty".to_string(),
            ));
        }

        let host = match (self.index_host, self.index_name.as_deref()) {
            (Some(host), _) => host,
            (None, Some(index_name)) => {
                let control = PineconeHttpClient::new(self.control_plane_url, api_key.clone())?
                    .with_timeout(self.timeout);
                resolve_host(&control, index_name).await?
            }
            (None, None) => {
                return Err(PineconeStoreError::Config(
                    "either index_host or index_name is required".to_string(),
                ))
            }
        };

        let client =
            PineconeHttpClient::new(with_scheme(&host), api_key)?.with_timeout(self.timeout);
        let retriever = PineconeRetriever::new(
            client,
            self.index_name,
            self.namespace,
            self.text_key,
        );
        if let Some(expected) = self.expected_dimension {
            retriever.validate_dimension_on_init(expected).await;
        }
        Ok(retriever)
    }
}

async fn resolve_host(
    control: &PineconeHttpClient,
    index_name: &str,
) -> Result<String, PineconeStoreError> {
    let described: DescribeIndexResponse =
        control.get_typed(&format!("/indexes/{index_name}")).await?;
    if described.host.trim().is_empty() {
        return Err(PineconeStoreError::Malformed(format!(
            "index '{index_name}' has no host"
        )));
    }
    tracing::info!(index_name, host = %described.host, "resolved pinecone index host");
    Ok(described.host)
}

/// The control plane reports bare hostnames.
fn with_scheme(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}
