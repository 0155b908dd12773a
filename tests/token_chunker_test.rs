use callscribe::application::services::{count_tokens, TokenChunker};
use callscribe::domain::{Speaker, TranscriptSegment};

fn segment(id: usize, speaker: Speaker, text: &str) -> TranscriptSegment {
    let start = id as f64 * 10.0;
    TranscriptSegment::new(id, speaker, start, start + 8.0, text.to_string())
}

fn talk_segments(count: usize) -> Vec<TranscriptSegment> {
    (0..count)
        .map(|i| {
            let speaker = if i % 2 == 0 {
                Speaker::Candidate
            } else {
                Speaker::Interviewer
            };
            segment(
                i,
                speaker,
                &format!(
                    "Turn number {} covers scaling the payment service and what the on-call rotation looked like in practice.",
                    i
                ),
            )
        })
        .collect()
}

#[test]
fn given_transcript_when_chunking_then_every_chunk_respects_token_budget() {
    let segments = talk_segments(40);
    let max_tokens = 60;

    let output = TokenChunker::new(max_tokens, 20).chunk(&segments);

    assert!(output.chunks.len() > 1);
    for chunk in &output.chunks {
        assert!(
            chunk.tokens <= max_tokens,
            "chunk {} has {} tokens",
            chunk.chunk_id,
            chunk.tokens
        );
    }
}

#[test]
fn given_transcript_when_chunking_then_deduplicated_concatenation_reconstructs_input() {
    let segments = talk_segments(30);

    let output = TokenChunker::new(80, 20).chunk(&segments);

    let mut seen = Vec::new();
    for chunk in &output.chunks {
        for s in &chunk.segments {
            if !seen.contains(&s.segment_id) {
                seen.push(s.segment_id);
            }
        }
    }
    let expected: Vec<usize> = segments.iter().map(|s| s.segment_id).collect();
    assert_eq!(seen, expected);
}

#[test]
fn given_consecutive_chunks_when_chunking_then_overlap_carries_trailing_segments() {
    let segments = talk_segments(30);

    let output = TokenChunker::new(120, 40).chunk(&segments);

    assert!(output.chunks.len() > 1);
    for pair in output.chunks.windows(2) {
        let previous_ids: Vec<usize> = pair[0].segments.iter().map(|s| s.segment_id).collect();
        let first_of_next = pair[1].segments.first().expect("chunks are never empty");
        assert!(
            previous_ids.contains(&first_of_next.segment_id),
            "chunk {} does not start inside chunk {}",
            pair[1].chunk_id,
            pair[0].chunk_id
        );
    }
}

#[test]
fn given_zero_overlap_when_chunking_then_no_segment_repeats() {
    let segments = talk_segments(24);

    let output = TokenChunker::new(100, 0).chunk(&segments);

    let total: usize = output.chunks.iter().map(|c| c.segment_count).count();
    assert!(total > 0);
    let all_ids: Vec<usize> = output
        .chunks
        .iter()
        .flat_map(|c| c.segments.iter().map(|s| s.segment_id))
        .collect();
    let mut deduped = all_ids.clone();
    deduped.dedup();
    assert_eq!(all_ids.len(), deduped.len());
}

#[test]
fn given_chunks_when_chunking_then_metadata_reflects_contents() {
    let segments = talk_segments(12);

    let output = TokenChunker::new(90, 15).chunk(&segments);

    for chunk in &output.chunks {
        let first = chunk.segments.first().expect("chunks are never empty");
        let last = chunk.segments.last().expect("chunks are never empty");
        assert_eq!(chunk.start_time, first.start_time);
        assert_eq!(chunk.end_time, last.end_time);
        assert_eq!(chunk.segment_count, chunk.segments.len());
        assert!(!chunk.speakers.is_empty());
        let expected_tokens: usize = chunk.segments.iter().map(|s| count_tokens(&s.text)).sum();
        assert_eq!(chunk.tokens, expected_tokens);
    }
}

#[test]
fn given_chunks_when_summarizing_then_totals_and_extremes_match() {
    let segments = talk_segments(20);

    let output = TokenChunker::new(100, 25).chunk(&segments);
    let summary = &output.summary;

    assert_eq!(summary.total_chunks, output.chunks.len());
    assert_eq!(
        summary.total_tokens,
        output.chunks.iter().map(|c| c.tokens).sum::<usize>()
    );
    assert_eq!(
        summary.max_tokens,
        output.chunks.iter().map(|c| c.tokens).max().unwrap()
    );
    assert_eq!(
        summary.min_tokens,
        output.chunks.iter().map(|c| c.tokens).min().unwrap()
    );
    assert_eq!(summary.chunk_details.len(), output.chunks.len());
}

#[test]
fn given_empty_segment_list_when_chunking_then_returns_empty_output() {
    let output = TokenChunker::new(100, 10).chunk(&[]);

    assert!(output.chunks.is_empty());
    assert_eq!(output.summary.total_chunks, 0);
    assert_eq!(output.summary.total_tokens, 0);
}

#[test]
fn given_everything_fits_when_chunking_then_single_chunk_covers_all_segments() {
    let segments = talk_segments(4);

    let output = TokenChunker::new(10_000, 200).chunk(&segments);

    assert_eq!(output.chunks.len(), 1);
    assert_eq!(output.chunks[0].segment_count, 4);
    assert_eq!(output.chunks[0].chunk_id, 1);
}
