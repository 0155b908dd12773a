use serde::{Deserialize, Serialize};

use super::Sentiment;

/// A speaker turn as it comes back from the analysis engine, before speaker
/// labels are mapped to roles and before any text cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    pub speaker_label: String,
    pub start_time: f64,
    pub end_time: f64,
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

impl RawSegment {
    pub fn new(speaker_label: String, start_time: f64, end_time: f64, text: String) -> Self {
        Self {
            speaker_label,
            start_time,
            end_time: end_time.max(start_time),
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

    pub fn shift(&mut self, offset: f64) {
        self.start_time += offset;
        self.end_time += offset;
    }

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
