use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::TranscriptSegment;

/// A token-bounded slice of the normalized transcript, sized for a text
/// model's context window. Consecutive chunks share a trailing overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptChunk {
    pub chunk_id: usize,
    pub text: String,
    pub tokens: usize,
    pub segments: Vec<TranscriptSegment>,
    pub start_time: f64,
    pub end_time: f64,
    pub speakers: Vec<String>,
    pub segment_count: usize,
}

impl TranscriptChunk {
    pub fn from_segments(chunk_id: usize, segments: Vec<TranscriptSegment>, tokens: usize) -> Self {
        let text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let start_time = segments.first().map(|s| s.start_time).unwrap_or(0.0);
        let end_time = segments.last().map(|s| s.end_time).unwrap_or(0.0);
        let speakers: BTreeSet<String> = segments
            .iter()
            .map(|s| s.speaker.as_str().to_string())
            .collect();
        let segment_count = segments.len();

        Self {
            chunk_id,
            text,
            tokens,
            segments,
            start_time,
            end_time,
            speakers: speakers.into_iter().collect(),
            segment_count,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkDetail {
    pub chunk_id: usize,
    pub tokens: usize,
    pub speakers: Vec<String>,
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkingSummary {
    pub total_chunks: usize,
    pub total_tokens: usize,
    pub avg_tokens_per_chunk: usize,
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub chunk_details: Vec<ChunkDetail>,
}

impl ChunkingSummary {
    pub fn from_chunks(chunks: &[TranscriptChunk]) -> Self {
        if chunks.is_empty() {
            return Self::default();
        }

        let token_counts: Vec<usize> = chunks.iter().map(|c| c.tokens).collect();
        let total_tokens: usize = token_counts.iter().sum();

        Self {
            total_chunks: chunks.len(),
            total_tokens,
            avg_tokens_per_chunk: total_tokens / chunks.len(),
            min_tokens: token_counts.iter().copied().min().unwrap_or(0),
            max_tokens: token_counts.iter().copied().max().unwrap_or(0),
            chunk_details: chunks
                .iter()
                .map(|c| ChunkDetail {
                    chunk_id: c.chunk_id,
                    tokens: c.tokens,
                    speakers: c.speakers.clone(),
                    duration: c.duration(),
                })
                .collect(),
        }
    }
}
