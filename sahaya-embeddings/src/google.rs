use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use sahaya_core::{Embedding, EmbeddingError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::EmbeddingProviderError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_EMBEDDING_MODEL: &str = "embedding-001";
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 768;

/// Client for the Generative Language `embedContent` endpoint.
#[derive(Clone)]
pub struct GoogleEmbedding {
    base_url: String,
    api_key: SecretString,
    model: String,
    dimension: usize,
    timeout: Option<Duration>,
    http: Client,
}

impl GoogleEmbedding {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, dimension: usize) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: SecretString::new(api_key.into()),
            model: model.into(),
            dimension,
            timeout: None,
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_name(&self) -> &str {
        self.model
            .strip_prefix("models/")
            .unwrap_or(self.model.as_str())
    }

    fn embed_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:embedContent",
            self.base_url.trim_end_matches('/'),
            self.model_name()
        )
    }

    fn map_send_error(&self, err: reqwest::Error) -> EmbeddingError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => EmbeddingError::Timeout(timeout),
            _ => EmbeddingProviderError::Request(err.to_string()).into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest<'a> {
    content: Content<'a>,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    #[serde(alias = "value")]
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[async_trait]
impl Embedding for GoogleEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let request = EmbedContentRequest {
            content: Content {
                parts: vec![Part { text }],
            },
        };

        let mut builder = self
            .http
            .post(self.embed_url())
            .query(&[("key", self.api_key.expose_secret().as_str())])
            .json(&request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|err| self.map_send_error(err))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(EmbeddingError::RateLimited {
                    retry_after: retry_after(&response),
                });
            }
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));
            return Err(EmbeddingProviderError::Request(message).into());
        }

        let response = response
            .json::<EmbedContentResponse>()
            .await
            .map_err(|err| EmbeddingProviderError::InvalidResponse(err.to_string()))?;

        if response.embedding.values.len() != self.dimension {
            return Err(EmbeddingProviderError::InvalidResponse(format!(
                "expected embedding dimension {}, got {}",
                self.dimension,
                response.embedding.values.len()
            ))
            .into());
        }

        tracing::trace!(model = %self.model, dimension = self.dimension, "embedded query");
        Ok(response.embedding.values)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
