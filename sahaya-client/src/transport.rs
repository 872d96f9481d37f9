use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::TransportError;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3000";

/// Delivers one user message to the chat endpoint and returns the answer.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, TransportError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    message: String,
}

#[derive(Clone)]
pub struct HttpChatTransport {
    url: String,
    timeout: Option<Duration>,
    http: Client,
}

impl HttpChatTransport {
    /// `endpoint` is the server origin; `/api/chat` is appended.
    pub fn new(endpoint: impl AsRef<str>) -> Self {
        Self {
            url: format!("{}/api/chat", endpoint.as_ref().trim_end_matches('/')),
            timeout: None,
            http: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        let mut request = self.http.post(&self.url).json(&ChatRequest { message });
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| self.map_reqwest(err))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|err| self.map_reqwest(err))?;
        let reply: ChatReply = serde_json::from_slice(&bytes)
            .map_err(|err| TransportError::Decode(err.to_string()))?;
        Ok(reply.message)
    }
}

impl HttpChatTransport {
    fn map_reqwest(&self, err: reqwest::Error) -> TransportError {
        match self.timeout {
            Some(timeout) if err.is_timeout() => TransportError::Timeout(timeout),
            _ => TransportError::Request(err.to_string()),
        }
    }
}
