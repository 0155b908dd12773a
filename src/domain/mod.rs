mod call_metrics;
mod call_result;
mod chunk_summary;
mod raw_segment;
mod sentiment;
mod speaker;
mod statistics;
mod task_id;
mod task_status;
mod transcript_chunk;
mod transcript_segment;

pub use call_metrics::{CallMetrics, CandidateQuestion};
pub use call_result::{
    CallMetadata, CallResult, CandidateStub, CommunicationAnalysis, RecruiterNotes,
    SentimentAnalysis, SentimentTimelineEntry, TranscriptBlock,
};
pub use chunk_summary::{ChunkSummary, MAX_KEY_QUESTIONS, MAX_KEY_TOPICS};
pub use raw_segment::RawSegment;
pub use sentiment::Sentiment;
pub use speaker::Speaker;
pub use statistics::{SpeakerStats, TranscriptStatistics};
pub use task_id::TaskId;
pub use task_status::{TaskStage, TaskState, TaskStatus};
pub use transcript_chunk::{ChunkDetail, ChunkingSummary, TranscriptChunk};
pub use transcript_segment::TranscriptSegment;
