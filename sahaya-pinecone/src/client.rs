use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::PineconeStoreError;

const API_VERSION: &str = "2024-07";

/// Thin JSON client shared by the data plane and the control plane.
#[derive(Clone, Debug)]
pub struct PineconeHttpClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    timeout: Option<Duration>,
}

impl PineconeHttpClient {
    pub fn new(base_url: String, api_key: String) -> Result<Self, PineconeStoreError> {
        if api_key.trim().is_empty() {
            return Err(PineconeStoreError::Config(
                "api_key cannot be empty".to_string(),
            ));
        }

        reqwest::Url::parse(&base_url)
            .map_err(|err| PineconeStoreError::Config(format!("invalid base_url: {err}")))?;

        Ok(Self {
            http: Client::new(),
            base_url,
            api_key: SecretString::new(api_key),
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub async fn get_typed<Resp>(&self, path: &str) -> Result<Resp, PineconeStoreError>
    where
        Resp: DeserializeOwned,
    {
        self.send(self.http.get(self.url(path)), None).await
    }

    pub async fn post_typed<Req, Resp>(
        &self,
        path: &str,
        payload: &Req,
    ) -> Result<Resp, PineconeStoreError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        self.post_typed_with_context(path, payload, None).await
    }

    pub async fn post_typed_with_context<Req, Resp>(
        &self,
        path: &str,
        payload: &Req,
        namespace: Option<&str>,
    ) -> Result<Resp, PineconeStoreError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let builder = self.http.post(self.url(path)).json(payload);
        self.send(builder, namespace).await
    }

    async fn send<Resp>(
        &self,
        builder: RequestBuilder,
        namespace: Option<&str>,
    ) -> Result<Resp, PineconeStoreError>
    where
        Resp: DeserializeOwned,
    {
        let mut builder = builder
            .header("Api-Key", self.api_key.expose_secret().as_str())
            .header("X-Pinecone-API-Version", API_VERSION);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|err| match self.timeout {
            Some(timeout) if err.is_timeout() => PineconeStoreError::Timeout(timeout),
            _ => PineconeStoreError::Transport(err.to_string()),
        })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Resp>()
                .await
                .map_err(|err| PineconeStoreError::Malformed(err.to_string()));
        }

        let retry_after_seconds = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        let body: Value = response
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::String(String::new()));
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| body.get("error").and_then(Value::as_str))
            .or_else(|| {
                body.get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(Value::as_str)
            })
            .unwrap_or("unknown pinecone error")
            .to_string();

        Err(PineconeStoreError::Api {
            status: status.as_u16(),
            message,
            retry_after_seconds,
            namespace: namespace.map(ToOwned::to_owned),
        })
    }
}
