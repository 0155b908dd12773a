use crate::domain::{ChunkingSummary, TranscriptChunk, TranscriptSegment};

use super::token_counter::count_tokens;

pub const DEFAULT_MAX_TOKENS: usize = 4000;
pub const DEFAULT_OVERLAP_TOKENS: usize = 200;

pub struct ChunkingOutput {
    pub chunks: Vec<TranscriptChunk>,
    pub summary: ChunkingSummary,
}

/// Splits the normalized transcript into overlapping, token-bounded chunks
/// for a context-limited text model. Consecutive chunks are seeded with a
/// trailing overlap from the previous chunk so cross-chunk context survives.
pub struct TokenChunker {
    max_tokens: usize,
    overlap_tokens: usize,
}

impl Default for TokenChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS, DEFAULT_OVERLAP_TOKENS)
    }
}

impl TokenChunker {
    pub fn new(max_tokens: usize, overlap_tokens: usize) -> Self {
        Self {
            max_tokens,
            overlap_tokens,
        }
    }

    pub fn chunk(&self, segments: &[TranscriptSegment]) -> ChunkingOutput {
        if segments.is_empty() {
            return ChunkingOutput {
                chunks: Vec::new(),
                summary: ChunkingSummary::default(),
            };
        }

        let mut chunks: Vec<TranscriptChunk> = Vec::new();
        let mut current: Vec<TranscriptSegment> = Vec::new();
        let mut current_tokens = 0usize;

        for segment in segments {
            let segment_tokens = count_tokens(&segment.text);

            if !current.is_empty() && current_tokens + segment_tokens > self.max_tokens {
                let closed = std::mem::take(&mut current);
                let closed_tokens = current_tokens;
                let (overlap, overlap_tokens) = self.trailing_overlap(&closed);
                chunks.push(TranscriptChunk::from_segments(
                    chunks.len() + 1,
                    closed,
                    closed_tokens,
                ));

                // Skip the overlap seed when it would not leave room for the
                // incoming segment.
                if overlap_tokens + segment_tokens <= self.max_tokens {
                    current = overlap;
                    current_tokens = overlap_tokens;
                } else {
                    current_tokens = 0;
                }
            }

            current.push(segment.clone());
            current_tokens += segment_tokens;
        }

        if !current.is_empty() {
            chunks.push(TranscriptChunk::from_segments(
                chunks.len() + 1,
                current,
                current_tokens,
            ));
        }

        tracing::info!(
            segments = segments.len(),
            chunks = chunks.len(),
            "Token chunking completed"
        );

        let summary = ChunkingSummary::from_chunks(&chunks);
        ChunkingOutput { chunks, summary }
    }

    /// Walk backward through a closed chunk, gathering segments until the
    /// overlap budget is reached.
    fn trailing_overlap(&self, segments: &[TranscriptSegment]) -> (Vec<TranscriptSegment>, usize) {
        let mut overlap: Vec<TranscriptSegment> = Vec::new();
        let mut tokens = 0usize;

        for segment in segments.iter().rev() {
            let segment_tokens = count_tokens(&segment.text);
            if tokens + segment_tokens > self.overlap_tokens {
                break;
            }
            overlap.insert(0, segment.clone());
            tokens += segment_tokens;
        }

        (overlap, tokens)
    }
}
