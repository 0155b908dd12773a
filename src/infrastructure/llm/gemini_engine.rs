use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::application::ports::{AnalysisEngine, AnalysisEngineError};

/// Gemini REST implementation of the analysis engine. Audio goes inline as
/// base64; both audio and text calls share the generateContent endpoint.
pub struct GeminiAnalysisEngine {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiAnalysisEngine {
    /// Generous per-call ceiling; audio analysis is slow but a hung call
    /// must not hang the task.
    pub const CALL_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(
        api_key: &str,
        base_url: Option<&str>,
        model: Option<&str>,
    ) -> Result<Self, AnalysisEngineError> {
        if api_key.trim().is_empty() {
            return Err(AnalysisEngineError::Auth(
                "analysis engine API key is not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Self::CALL_TIMEOUT)
            .build()
            .map_err(|e| AnalysisEngineError::ApiRequestFailed(format!("client build: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or("https://generativelanguage.googleapis.com")
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or("gemini-2.5-flash").to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn generate(&self, body: serde_json::Value) -> Result<String, AnalysisEngineError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisEngineError::Timeout(e.to_string())
                } else {
                    AnalysisEngineError::ApiRequestFailed(format!("request: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AnalysisEngineError::Auth(format!("status {}: {}", status, text))
                }
                StatusCode::TOO_MANY_REQUESTS => AnalysisEngineError::RateLimited,
                s if s.is_server_error() => {
                    AnalysisEngineError::ApiRequestFailed(format!("status {}: {}", status, text))
                }
                _ => AnalysisEngineError::InvalidResponse(format!("status {}: {}", status, text)),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AnalysisEngineError::InvalidResponse(format!("parse response: {}", e)))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalysisEngineError::InvalidResponse(
                "empty completion".to_string(),
            ));
        }

        Ok(text)
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[async_trait]
impl AnalysisEngine for GeminiAnalysisEngine {
    async fn analyze_audio(
        &self,
        audio_data: &[u8],
        instruction: &str,
    ) -> Result<String, AnalysisEngineError> {
        let encoded = general_purpose::STANDARD.encode(audio_data);

        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": "audio/wav",
                            "data": encoded
                        }
                    },
                    { "text": instruction }
                ]
            }]
        });

        tracing::debug!(
            model = %self.model,
            audio_bytes = audio_data.len(),
            "Sending audio to analysis engine"
        );

        let text = self.generate(body).await?;

        tracing::info!(chars = text.len(), "Audio analysis completed");
        Ok(text)
    }

    async fn analyze_text(&self, prompt: &str) -> Result<String, AnalysisEngineError> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Sending text to analysis engine");

        let text = self.generate(body).await?;

        tracing::info!(chars = text.len(), "Text analysis completed");
        Ok(text)
    }
}
