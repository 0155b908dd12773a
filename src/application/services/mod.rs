pub mod analysis_aggregator;
pub mod engine_response;
pub mod segment_merger;
pub mod task_runner;
pub mod token_chunker;
mod token_counter;
pub mod transcript_normalizer;
pub mod transcription_orchestrator;
pub mod wav;

pub use analysis_aggregator::aggregate;
pub use engine_response::{parse_engine_response, EngineResponse};
pub use segment_merger::{merge, merge_short_fillers};
pub use task_runner::{Outcome, PipelineError, TaskRunner, TaskRunnerConfig, UploadPayload};
pub use token_chunker::{ChunkingOutput, TokenChunker};
pub use token_counter::count_tokens;
pub use transcript_normalizer::{NormalizationOutput, TranscriptNormalizer};
pub use transcription_orchestrator::{
    OrchestratorConfig, TranscriptionError, TranscriptionOrchestrator, TranscriptionOutput,
};
