//! Google Gemini `generateContent` client

use std::time::Duration;

use reqwest::Client;
use sahaya_core::{GenerationError, Llm};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash-exp";

#[derive(Clone)]
pub struct GoogleClient {
    base_url: String,
    api_key: SecretString,
    model: String,
    timeout: Duration,
    http: Client,
}

impl GoogleClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: SecretString::new(api_key.into()),
            model: model.into(),
            timeout: Duration::from_secs(120),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_name(&self) -> &str {
        let model = self.model.trim();
        model.strip_prefix("models/").unwrap_or(model)
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model_name()
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

fn is_blocked_finish_reason(reason: &str) -> bool {
    matches!(reason, "SAFETY" | "RECITATION" | "BLOCKLIST")
}

/// The prompt is sent as one user turn; nothing from earlier calls is replayed.
fn build_request(prompt: &str) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: [RequestContent {
            role: "user",
            parts: [RequestPart { text: prompt }],
        }],
    }
}

#[async_trait::async_trait]
impl Llm for GoogleClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = build_request(prompt);

        let response = self
            .http
            .post(self.generate_url())
            .query(&[("key", self.api_key.expose_secret().as_str())])
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GenerationError::Timeout(self.timeout)
                } else {
                    GenerationError::Provider(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));
            return Err(GenerationError::Provider(message));
        }

        let response = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| GenerationError::Provider(err.to_string()))?;

        let candidate = response
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .ok_or(GenerationError::NoCandidates)?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            if let Some(reason) = candidate
                .finish_reason
                .filter(|reason| is_blocked_finish_reason(reason))
            {
                return Err(GenerationError::Blocked(reason));
            }
        }

        tracing::debug!(model = %self.model, answer_len = text.len(), "generation complete");
        Ok(text)
    }
}
