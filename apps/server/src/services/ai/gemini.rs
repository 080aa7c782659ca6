//! Client for the Google generative-language API.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::{AiError, GenerativeModel};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP connect timeout for provider calls.
const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest provider error body kept in logs.
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
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

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Result<String, AiError> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AiError::InvalidReply(
                "response contained no text".to_string(),
            ));
        }
        Ok(text)
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: &str, timeout: Duration) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .build()
            .map_err(|e| AiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model: model.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&serde_json::json!({
                "contents": [{ "parts": [{ "text": prompt }] }],
                "generationConfig": { "temperature": 0.2 },
            }))
            .send()
            .await
            .map_err(|e| AiError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Provider {
                status: status.as_u16(),
                body: super::truncate_chars(&body, MAX_ERROR_BODY).to_string(),
            });
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| AiError::InvalidReply(format!("Failed to parse response: {}", e)))?
            .text()
    }
}
