use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    CallMetrics, ChunkSummary, ChunkingSummary, Sentiment, TaskId, TaskState, TranscriptChunk,
    TranscriptSegment, TranscriptStatistics,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallMetadata {
    pub filename: String,
    pub language: String,
    pub diarization_enabled: bool,
}

/// Business identity passed through from the upload; not validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateStub {
    pub candidate_id: i64,
    pub job_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunicationAnalysis {
    pub avg_clarity: f64,
    pub avg_confidence: f64,
    pub avg_fluency: f64,
    pub avg_professionalism: f64,
    pub enthusiasm_score: f64,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentTimelineEntry {
    pub segment_index: usize,
    pub timestamp: String,
    pub sentiment: Option<Sentiment>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub avg_sentiment_score: f64,
    pub dominant_sentiment: Sentiment,
    pub interest_level: f64,
    pub hesitation_detected: bool,
    pub stress_detected: bool,
    pub timeline: Vec<SentimentTimelineEntry>,
}

impl Default for SentimentAnalysis {
    fn default() -> Self {
        Self {
            avg_sentiment_score: 50.0,
            dominant_sentiment: Sentiment::Neutral,
            interest_level: 50.0,
            hesitation_detected: false,
            stress_detected: false,
            timeline: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecruiterNotes {
    pub summary: String,
    pub highlights: Vec<String>,
    pub concerns: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptBlock {
    pub segments: Vec<TranscriptSegment>,
    pub statistics: TranscriptStatistics,
    pub raw_text: String,
}

/// The terminal artifact of one processing task. Created in memory at task
/// start, mutated stage by stage, written to the status store at creation,
/// after each stage, and at terminal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    pub task_id: TaskId,
    pub state: TaskState,
    pub metadata: CallMetadata,
    pub candidate: CandidateStub,
    #[serde(default)]
    pub communication_analysis: CommunicationAnalysis,
    #[serde(default)]
    pub sentiment_analysis: SentimentAnalysis,
    #[serde(default)]
    pub recruiter_notes: RecruiterNotes,
    #[serde(default)]
    pub transcript: TranscriptBlock,
    #[serde(default)]
    pub chunks: Vec<TranscriptChunk>,
    #[serde(default)]
    pub chunking_summary: ChunkingSummary,
    #[serde(default)]
    pub chunk_summaries: Vec<ChunkSummary>,
    #[serde(default)]
    pub final_summary: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub retry_count: u32,
}

impl CallResult {
    pub fn new(task_id: TaskId, metadata: CallMetadata, candidate: CandidateStub) -> Self {
        Self {
            task_id,
            state: TaskState::Pending,
            metadata,
            candidate,
            communication_analysis: CommunicationAnalysis::default(),
            sentiment_analysis: SentimentAnalysis::default(),
            recruiter_notes: RecruiterNotes::default(),
            transcript: TranscriptBlock::default(),
            chunks: Vec::new(),
            chunking_summary: ChunkingSummary::default(),
            chunk_summaries: Vec::new(),
            final_summary: String::new(),
            created_at: Utc::now(),
            completed_at: None,
            error: None,
            retry_count: 0,
        }
    }

    pub fn apply_metrics(&mut self, metrics: &CallMetrics) {
        self.communication_analysis = CommunicationAnalysis {
            avg_clarity: metrics.avg_clarity,
            avg_confidence: metrics.avg_confidence,
            avg_fluency: metrics.avg_fluency,
            avg_professionalism: metrics.avg_professionalism,
            enthusiasm_score: metrics.enthusiasm_score,
            strengths: metrics.strengths.clone(),
            concerns: metrics.concerns.clone(),
        };
        self.sentiment_analysis = SentimentAnalysis {
            avg_sentiment_score: metrics.avg_sentiment_score,
            dominant_sentiment: metrics.dominant_sentiment,
            interest_level: metrics.interest_level,
            hesitation_detected: metrics.hesitation_detected,
            stress_detected: metrics.stress_detected,
            timeline: self
                .transcript
                .segments
                .iter()
                .enumerate()
                .map(|(index, segment)| SentimentTimelineEntry {
                    segment_index: index,
                    timestamp: segment.timestamp.clone(),
                    sentiment: segment.sentiment,
                    score: segment.sentiment_score,
                })
                .collect(),
        };
    }

    pub fn mark_success(&mut self) {
        self.state = TaskState::Success;
        self.completed_at = Some(Utc::now());
        self.error = None;
    }

    pub fn mark_failed(&mut self, error: String, retry_count: u32) {
        self.state = TaskState::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(error);
        self.retry_count = retry_count;
    }
}
