use serde::{Deserialize, Serialize};

use super::Sentiment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateQuestion {
    pub timestamp: String,
    pub text: String,
}

/// Call-level metrics reduced from the full segment set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallMetrics {
    pub avg_clarity: f64,
    pub avg_confidence: f64,
    pub avg_fluency: f64,
    pub avg_professionalism: f64,
    pub avg_sentiment_score: f64,
    pub dominant_sentiment: Sentiment,
    pub interest_level: f64,
    pub enthusiasm_score: f64,
    pub hesitation_detected: bool,
    pub stress_detected: bool,
    pub candidate_questions: Vec<CandidateQuestion>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

impl CallMetrics {
    /// The documented all-zero/neutral object returned for an empty segment
    /// list. Aggregation never fails on empty input.
    pub fn default_neutral() -> Self {
        Self {
            avg_clarity: 0.0,
            avg_confidence: 0.0,
            avg_fluency: 0.0,
            avg_professionalism: 0.0,
            avg_sentiment_score: 50.0,
            dominant_sentiment: Sentiment::Neutral,
            interest_level: 50.0,
            enthusiasm_score: 0.0,
            hesitation_detected: false,
            stress_detected: false,
            candidate_questions: Vec::new(),
            strengths: Vec::new(),
            concerns: Vec::new(),
        }
    }
}
