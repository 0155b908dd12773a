use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    AudioError, AudioPreprocessor, PreprocessOptions, StatusStore, StatusStoreError,
};
use crate::domain::{
    CallMetadata, CallResult, CandidateStub, TaskId, TaskStage, TaskState, TaskStatus,
};

use super::analysis_aggregator::aggregate;
use super::segment_merger::merge_short_fillers;
use super::token_chunker::TokenChunker;
use super::transcript_normalizer::TranscriptNormalizer;
use super::transcription_orchestrator::{
    TranscriptionError, TranscriptionOrchestrator, TranscriptionOutput,
};

/// The upload handed to one task execution. Business metadata passes through
/// into the result untouched.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub candidate_id: i64,
    pub job_id: i64,
    pub language: String,
    pub diarization: bool,
}

#[derive(Debug, Clone)]
pub struct TaskRunnerConfig {
    pub max_retries: u32,
    pub retry_backoff: Duration,
    /// Hard wall-clock budget per attempt; exceeding it is terminal.
    pub time_budget: Duration,
    pub status_ttl: Duration,
    pub result_ttl_success: Duration,
    pub result_ttl_failure: Duration,
    pub preprocess: PreprocessOptions,
}

impl Default for TaskRunnerConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_backoff: Duration::from_secs(60),
            time_budget: Duration::from_secs(600),
            status_ttl: Duration::from_secs(60 * 60 * 24),
            result_ttl_success: Duration::from_secs(60 * 60 * 24 * 7),
            result_ttl_failure: Duration::from_secs(60 * 60 * 24),
            preprocess: PreprocessOptions::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("audio preprocessing: {0}")]
    Audio(#[from] AudioError),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("status store: {0}")]
    Store(#[from] StatusStoreError),
    #[error("task exceeded time budget of {0} seconds")]
    TimeBudgetExceeded(u64),
}

impl PipelineError {
    fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Audio(_) => false,
            PipelineError::Transcription(e) => e.is_transient(),
            PipelineError::Store(_) => true,
            PipelineError::TimeBudgetExceeded(_) => false,
        }
    }
}

/// Explicit stage-loop outcome; the runner makes retry decisions from this
/// instead of relying on exception semantics of any particular queue.
#[derive(Debug)]
pub enum Outcome {
    Success,
    RetryableFailure(String),
    FatalFailure(String),
}

impl Outcome {
    fn from_error(error: &PipelineError) -> Self {
        if error.is_retryable() {
            Outcome::RetryableFailure(error.to_string())
        } else {
            Outcome::FatalFailure(error.to_string())
        }
    }
}

/// Drives one upload through the pipeline stages, persisting progress to the
/// status store before each stage and the full result at every transition.
/// Owns its task's keys exclusively for the duration of the run.
pub struct TaskRunner {
    preprocessor: Arc<dyn AudioPreprocessor>,
    orchestrator: TranscriptionOrchestrator,
    normalizer: TranscriptNormalizer,
    chunker: TokenChunker,
    store: Arc<dyn StatusStore>,
    config: TaskRunnerConfig,
}

impl TaskRunner {
    pub fn new(
        preprocessor: Arc<dyn AudioPreprocessor>,
        orchestrator: TranscriptionOrchestrator,
        normalizer: TranscriptNormalizer,
        chunker: TokenChunker,
        store: Arc<dyn StatusStore>,
        config: TaskRunnerConfig,
    ) -> Self {
        Self {
            preprocessor,
            orchestrator,
            normalizer,
            chunker,
            store,
            config,
        }
    }

    /// Execute one task to a terminal state. Always returns the terminal
    /// `CallResult`; the store holds the same state the caller sees.
    pub async fn run(&self, task_id: TaskId, payload: UploadPayload) -> CallResult {
        let span = tracing::info_span!(
            "call_task",
            task_id = %task_id,
            filename = %payload.filename,
            candidate_id = payload.candidate_id,
        );
        let _guard = span.enter();

        let metadata = CallMetadata {
            filename: payload.filename.clone(),
            language: payload.language.clone(),
            diarization_enabled: payload.diarization,
        };
        let candidate = CandidateStub {
            candidate_id: payload.candidate_id,
            job_id: payload.job_id,
        };
        let mut result = CallResult::new(task_id, metadata, candidate);

        self.persist_running(&TaskStatus::pending(task_id), &result)
            .await;

        let mut attempt: u32 = 0;
        loop {
            result.state = TaskState::Processing;
            result.error = None;
            result.retry_count = attempt;

            let mut stage = TaskStage::Preprocessing;
            let attempt_result = tokio::time::timeout(
                self.config.time_budget,
                self.execute(&payload, &mut result, &mut stage),
            )
            .await;

            let outcome = match attempt_result {
                Ok(Ok(())) => Outcome::Success,
                Ok(Err(e)) => {
                    tracing::error!(error = %e, stage = %stage, "Pipeline stage failed");
                    Outcome::from_error(&e)
                }
                Err(_) => {
                    let budget = self.config.time_budget.as_secs();
                    tracing::error!(stage = %stage, budget_secs = budget, "Task exceeded time budget");
                    Outcome::from_error(&PipelineError::TimeBudgetExceeded(budget))
                }
            };

            match outcome {
                Outcome::Success => {
                    result.mark_success();
                    self.persist_terminal(&TaskStatus::success(task_id), &result)
                        .await;
                    tracing::info!("Call processing completed");
                    return result;
                }
                Outcome::RetryableFailure(message) if attempt < self.config.max_retries => {
                    // State visibility must never lag: the failure is
                    // persisted before the backoff, then the next attempt
                    // overwrites it.
                    result.mark_failed(message.clone(), attempt);
                    self.persist_terminal(
                        &TaskStatus::failed(task_id, stage, message.clone()),
                        &result,
                    )
                    .await;

                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        backoff_secs = self.config.retry_backoff.as_secs(),
                        "Retrying after transient failure"
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
                Outcome::RetryableFailure(message) | Outcome::FatalFailure(message) => {
                    result.mark_failed(message.clone(), attempt);
                    self.persist_terminal(&TaskStatus::failed(task_id, stage, message), &result)
                        .await;
                    tracing::error!("Call processing failed terminally");
                    return result;
                }
            }
        }
    }

    async fn execute(
        &self,
        payload: &UploadPayload,
        result: &mut CallResult,
        stage: &mut TaskStage,
    ) -> Result<(), PipelineError> {
        let task_id = result.task_id;

        *stage = TaskStage::Preprocessing;
        self.store
            .put_status(&TaskStatus::processing(task_id, *stage))
            .await?;
        let wav_bytes =
            self.preprocessor
                .process(&payload.bytes, &payload.filename, self.config.preprocess)?;
        self.persist_running_result(result).await;

        *stage = TaskStage::Transcription;
        self.store
            .put_status(&TaskStatus::processing(task_id, *stage))
            .await?;
        let TranscriptionOutput {
            segments: raw_segments,
            chunk_summaries,
            final_summary,
        } = self.orchestrator.transcribe(&wav_bytes).await?;
        result.chunk_summaries = chunk_summaries;
        result.final_summary = final_summary;
        self.persist_running_result(result).await;

        *stage = TaskStage::Normalization;
        self.store
            .put_status(&TaskStatus::processing(task_id, *stage))
            .await?;
        let normalized = self.normalizer.normalize(raw_segments);
        let segments = merge_short_fillers(normalized.segments);
        let raw_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        result.transcript.statistics = normalized.statistics;
        result.transcript.raw_text = raw_text;
        result.transcript.segments = segments;

        let metrics = aggregate(&result.transcript.segments);
        result.apply_metrics(&metrics);
        let notes = build_recruiter_notes(&result.final_summary, &metrics);
        result.recruiter_notes = notes;
        self.persist_running_result(result).await;

        *stage = TaskStage::Chunking;
        self.store
            .put_status(&TaskStatus::processing(task_id, *stage))
            .await?;
        let chunking = self.chunker.chunk(&result.transcript.segments);
        result.chunks = chunking.chunks;
        result.chunking_summary = chunking.summary;

        *stage = TaskStage::Completed;
        Ok(())
    }

    async fn persist_running(&self, status: &TaskStatus, result: &CallResult) {
        if let Err(e) = self.store.put_status(status).await {
            tracing::warn!(error = %e, "Failed to write initial task status");
        }
        self.persist_running_result(result).await;
    }

    async fn persist_running_result(&self, result: &CallResult) {
        if let Err(e) = self.store.put_result(result, self.config.status_ttl).await {
            tracing::warn!(error = %e, "Failed to write intermediate call result");
        }
    }

    /// Terminal writes are best-effort: the task is already decided, and a
    /// store outage here must not turn a finished task into a crash loop.
    async fn persist_terminal(&self, status: &TaskStatus, result: &CallResult) {
        if let Err(e) = self.store.put_status(status).await {
            tracing::warn!(error = %e, "Failed to write terminal task status");
        }
        let ttl = if result.state == TaskState::Success {
            self.config.result_ttl_success
        } else {
            self.config.result_ttl_failure
        };
        if let Err(e) = self.store.put_result(result, ttl).await {
            tracing::warn!(error = %e, "Failed to write terminal call result");
        }
    }
}

fn build_recruiter_notes(
    final_summary: &str,
    metrics: &crate::domain::CallMetrics,
) -> crate::domain::RecruiterNotes {
    let mut highlights = metrics.strengths.clone();
    if !metrics.candidate_questions.is_empty() {
        highlights.push(format!(
            "Candidate asked {} question(s)",
            metrics.candidate_questions.len()
        ));
    }

    let mut next_steps = Vec::new();
    if metrics.hesitation_detected {
        next_steps.push("Follow up on areas where the candidate hesitated".to_string());
    }
    if metrics.stress_detected {
        next_steps.push("Consider a more informal follow-up conversation".to_string());
    }
    for question in &metrics.candidate_questions {
        next_steps.push(format!("Answer the candidate's question: {}", question.text));
    }

    crate::domain::RecruiterNotes {
        summary: final_summary.to_string(),
        highlights,
        concerns: metrics.concerns.clone(),
        next_steps,
    }
}
