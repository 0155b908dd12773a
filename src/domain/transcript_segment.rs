use serde::{Deserialize, Serialize};

use super::{Sentiment, Speaker};

/// One contiguous speaker turn in the final timeline.
///
/// Timestamps are seconds from the start of the call. Segments originating
/// from a later audio window carry that window's cumulative offset, so the
/// full list stays ordered by `start_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub segment_id: usize,
    pub speaker: Speaker,
    pub start_time: f64,
    pub end_time: f64,
    /// Human-readable `MM:SS` (or `HH:MM:SS` past one hour), derived from
    /// `start_time` during normalization.
    #[serde(default)]
    pub timestamp: String,
    pub text: String,
    #[serde(default)]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub clarity: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub fluency: Option<f64>,
    #[serde(default)]
    pub professionalism: Option<f64>,
    #[serde(default)]
    pub is_question: bool,
    #[serde(default)]
    pub question_text: Option<String>,
}

impl TranscriptSegment {
    pub fn new(segment_id: usize, speaker: Speaker, start_time: f64, end_time: f64, text: String) -> Self {
        Self {
            segment_id,
            speaker,
            start_time,
            end_time: end_time.max(start_time),
            timestamp: String::new(),
            text,
            sentiment: None,
            sentiment_score: None,
            clarity: None,
            confidence: None,
            fluency: None,
            professionalism: None,
            is_question: false,
            question_text: None,
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Shift both timestamps by an audio-window offset.
    pub fn shift(&mut self, offset: f64) {
        self.start_time += offset;
        self.end_time += offset;
    }

    /// Clamp sentiment to [-100, 100] and the quality scores to [0, 100].
    pub fn clamp_scores(&mut self) {
        if let Some(s) = self.sentiment_score.as_mut() {
            *s = s.clamp(-100.0, 100.0);
        }
        for score in [
            &mut self.clarity,
            &mut self.confidence,
            &mut self.fluency,
            &mut self.professionalism,
        ] {
            if let Some(v) = score.as_mut() {
                *v = v.clamp(0.0, 100.0);
            }
        }
    }

    pub fn has_quality_scores(&self) -> bool {
        self.clarity.is_some()
            || self.confidence.is_some()
            || self.fluency.is_some()
            || self.professionalism.is_some()
    }
}
