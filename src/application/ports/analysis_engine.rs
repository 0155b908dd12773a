use async_trait::async_trait;

/// External AI service that turns audio or text into structured analysis.
/// Treated as a contract; the pipeline never depends on a concrete vendor.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Send audio plus an analysis instruction, returning the model's raw
    /// text response (structured JSON is the expected but not guaranteed
    /// shape).
    async fn analyze_audio(
        &self,
        audio_data: &[u8],
        instruction: &str,
    ) -> Result<String, AnalysisEngineError>;

    /// Text-only call, used for summary reduction and score annotation.
    async fn analyze_text(&self, prompt: &str) -> Result<String, AnalysisEngineError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisEngineError {
    #[error("missing or invalid credentials: {0}")]
    Auth(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AnalysisEngineError {
    /// Server-side and network failures are worth retrying; a bad credential
    /// is not.
    pub fn is_transient(&self) -> bool {
        match self {
            AnalysisEngineError::Auth(_) => false,
            AnalysisEngineError::ApiRequestFailed(_) => true,
            AnalysisEngineError::Timeout(_) => true,
            AnalysisEngineError::RateLimited => true,
            AnalysisEngineError::InvalidResponse(_) => false,
        }
    }
}
