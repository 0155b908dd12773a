use crate::domain::{CallMetrics, CandidateQuestion, Sentiment, Speaker, TranscriptSegment};

const STRENGTH_THRESHOLD: f64 = 75.0;
const CONCERN_THRESHOLD: f64 = 50.0;
const HESITATION_RATIO: f64 = 0.2;
const STRESS_RATIO: f64 = 0.3;

/// Reduce the full segment set to call-level metrics. Empty input yields the
/// documented neutral default object.
pub fn aggregate(segments: &[TranscriptSegment]) -> CallMetrics {
    if segments.is_empty() {
        return CallMetrics::default_neutral();
    }

    let avg_clarity = average(segments, |s| s.clarity);
    let avg_confidence = average(segments, |s| s.confidence);
    let avg_fluency = average(segments, |s| s.fluency);
    let avg_professionalism = average(segments, |s| s.professionalism);

    let sentiment_scores: Vec<f64> = segments.iter().filter_map(|s| s.sentiment_score).collect();
    let avg_sentiment_score = if sentiment_scores.is_empty() {
        50.0
    } else {
        sentiment_scores.iter().sum::<f64>() / sentiment_scores.len() as f64
    };

    let positive = count_sentiment(segments, Sentiment::Positive);
    let neutral = count_sentiment(segments, Sentiment::Neutral);
    let negative = count_sentiment(segments, Sentiment::Negative);

    let dominant_sentiment = if positive > neutral && positive > negative {
        Sentiment::Positive
    } else if negative > positive && negative > neutral {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let total = segments.len() as f64;
    let positive_ratio = positive as f64 / total;
    let negative_ratio = negative as f64 / total;

    let interest_level = match dominant_sentiment {
        Sentiment::Positive => (50.0 + 50.0 * positive_ratio).clamp(0.0, 100.0),
        Sentiment::Negative => (50.0 - 50.0 * negative_ratio).clamp(0.0, 100.0),
        Sentiment::Neutral => 50.0,
    };

    let enthusiasm_score = (avg_confidence + avg_fluency) / 2.0;

    let candidate_questions = segments
        .iter()
        .filter(|s| s.speaker == Speaker::Candidate && s.is_question)
        .map(|s| CandidateQuestion {
            timestamp: s.timestamp.clone(),
            text: s
                .question_text
                .clone()
                .unwrap_or_else(|| s.text.clone()),
        })
        .collect();

    let dimensions = [
        ("clarity", avg_clarity),
        ("confidence", avg_confidence),
        ("fluency", avg_fluency),
        ("professionalism", avg_professionalism),
    ];

    let mut strengths: Vec<String> = dimensions
        .iter()
        .filter(|(_, value)| *value > STRENGTH_THRESHOLD)
        .map(|(name, value)| format!("Strong {} ({:.0}/100)", name, value))
        .collect();
    let concerns: Vec<String> = dimensions
        .iter()
        .filter(|(_, value)| *value < CONCERN_THRESHOLD)
        .map(|(name, value)| format!("Low {} ({:.0}/100)", name, value))
        .collect();

    // Never report an empty strengths list when there is data: surface the
    // best dimension as a relative strength.
    if strengths.is_empty() {
        if let Some((name, value)) = dimensions
            .iter()
            .filter(|(_, value)| *value > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1))
        {
            strengths.push(format!("Relative strength: {} ({:.0}/100)", name, value));
        }
    }

    CallMetrics {
        avg_clarity,
        avg_confidence,
        avg_fluency,
        avg_professionalism,
        avg_sentiment_score,
        dominant_sentiment,
        interest_level,
        enthusiasm_score,
        hesitation_detected: negative_ratio > HESITATION_RATIO,
        stress_detected: negative_ratio > STRESS_RATIO,
        candidate_questions,
        strengths,
        concerns,
    }
}

fn average(segments: &[TranscriptSegment], field: impl Fn(&TranscriptSegment) -> Option<f64>) -> f64 {
    let values: Vec<f64> = segments.iter().filter_map(&field).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn count_sentiment(segments: &[TranscriptSegment], sentiment: Sentiment) -> usize {
    segments
        .iter()
        .filter(|s| s.sentiment == Some(sentiment))
        .count()
}
