use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TranscriptSegment;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeakerStats {
    pub segments: usize,
    pub words: usize,
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptStatistics {
    pub total_segments: usize,
    pub total_duration: f64,
    pub total_words: usize,
    pub speaker_breakdown: BTreeMap<String, SpeakerStats>,
}

impl TranscriptStatistics {
    pub fn from_segments(segments: &[TranscriptSegment]) -> Self {
        if segments.is_empty() {
            return Self::default();
        }

        let mut breakdown: BTreeMap<String, SpeakerStats> = BTreeMap::new();
        let mut total_words = 0;

        for segment in segments {
            let words = segment.word_count();
            total_words += words;

            let entry = breakdown.entry(segment.speaker.as_str().to_string()).or_default();
            entry.segments += 1;
            entry.words += words;
            entry.duration += segment.duration();
        }

        let total_duration = segments.last().map(|s| s.end_time).unwrap_or(0.0);

        Self {
            total_segments: segments.len(),
            total_duration: (total_duration * 100.0).round() / 100.0,
            total_words,
            speaker_breakdown: breakdown,
        }
    }
}
