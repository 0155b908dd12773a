use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{AnalysisEngine, AnalysisEngineError};

/// Scripted engine for tests and offline runs: pops queued responses in
/// order, counting calls by kind.
#[derive(Default)]
pub struct MockAnalysisEngine {
    responses: Mutex<VecDeque<Result<String, AnalysisEngineError>>>,
    audio_calls: AtomicUsize,
    text_calls: AtomicUsize,
}

impl MockAnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, response: impl Into<String>) {
        self.responses
            .lock()
            .expect("mock lock never poisoned")
            .push_back(Ok(response.into()));
    }

    pub fn push_err(&self, error: AnalysisEngineError) {
        self.responses
            .lock()
            .expect("mock lock never poisoned")
            .push_back(Err(error));
    }

    pub fn audio_calls(&self) -> usize {
        self.audio_calls.load(Ordering::SeqCst)
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    fn next(&self) -> Result<String, AnalysisEngineError> {
        self.responses
            .lock()
            .expect("mock lock never poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(AnalysisEngineError::InvalidResponse(
                    "mock engine has no scripted response".to_string(),
                ))
            })
    }
}

#[async_trait::async_trait]
impl AnalysisEngine for MockAnalysisEngine {
    async fn analyze_audio(
        &self,
        _audio_data: &[u8],
        _instruction: &str,
    ) -> Result<String, AnalysisEngineError> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        self.next()
    }

    async fn analyze_text(&self, _prompt: &str) -> Result<String, AnalysisEngineError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.next()
    }
}
