use callscribe::application::services::aggregate;
use callscribe::domain::{CallMetrics, Sentiment, Speaker, TranscriptSegment};

fn segment(id: usize, speaker: Speaker, text: &str) -> TranscriptSegment {
    let start = id as f64 * 5.0;
    let mut s = TranscriptSegment::new(id, speaker, start, start + 4.0, text.to_string());
    s.timestamp = format!("00:{:02}", id * 5);
    s
}

fn scored(id: usize, sentiment: Sentiment, quality: f64) -> TranscriptSegment {
    let mut s = segment(id, Speaker::Candidate, "an answer");
    s.sentiment = Some(sentiment);
    s.sentiment_score = Some(match sentiment {
        Sentiment::Positive => 60.0,
        Sentiment::Neutral => 0.0,
        Sentiment::Negative => -60.0,
    });
    s.clarity = Some(quality);
    s.confidence = Some(quality);
    s.fluency = Some(quality);
    s.professionalism = Some(quality);
    s
}

#[test]
fn given_empty_segment_list_when_aggregating_then_returns_neutral_default() {
    let metrics = aggregate(&[]);

    assert_eq!(metrics, CallMetrics::default_neutral());
    assert_eq!(metrics.avg_sentiment_score, 50.0);
    assert_eq!(metrics.interest_level, 50.0);
    assert_eq!(metrics.dominant_sentiment, Sentiment::Neutral);
    assert!(metrics.strengths.is_empty());
}

#[test]
fn given_segments_with_partial_scores_when_aggregating_then_averages_only_carriers() {
    let mut a = segment(0, Speaker::Candidate, "one");
    a.clarity = Some(80.0);
    let mut b = segment(1, Speaker::Candidate, "two");
    b.clarity = Some(60.0);
    let c = segment(2, Speaker::Interviewer, "three");

    let metrics = aggregate(&[a, b, c]);

    assert_eq!(metrics.avg_clarity, 70.0);
    // No segment carries fluency, so it averages to zero.
    assert_eq!(metrics.avg_fluency, 0.0);
}

#[test]
fn given_majority_positive_sentiment_when_aggregating_then_interest_rises_with_ratio() {
    let segments = vec![
        scored(0, Sentiment::Positive, 80.0),
        scored(1, Sentiment::Positive, 80.0),
        scored(2, Sentiment::Positive, 80.0),
        scored(3, Sentiment::Negative, 80.0),
    ];

    let metrics = aggregate(&segments);

    assert_eq!(metrics.dominant_sentiment, Sentiment::Positive);
    // 50 + 50 * (3/4)
    assert_eq!(metrics.interest_level, 87.5);
}

#[test]
fn given_majority_negative_sentiment_when_aggregating_then_interest_drops_and_flags_raise() {
    let segments = vec![
        scored(0, Sentiment::Negative, 60.0),
        scored(1, Sentiment::Negative, 60.0),
        scored(2, Sentiment::Negative, 60.0),
        scored(3, Sentiment::Positive, 60.0),
    ];

    let metrics = aggregate(&segments);

    assert_eq!(metrics.dominant_sentiment, Sentiment::Negative);
    // 50 - 50 * (3/4)
    assert_eq!(metrics.interest_level, 12.5);
    assert!(metrics.hesitation_detected);
    assert!(metrics.stress_detected);
}

#[test]
fn given_no_strict_majority_when_aggregating_then_dominant_sentiment_is_neutral() {
    let segments = vec![
        scored(0, Sentiment::Positive, 60.0),
        scored(1, Sentiment::Negative, 60.0),
    ];

    let metrics = aggregate(&segments);

    assert_eq!(metrics.dominant_sentiment, Sentiment::Neutral);
    assert_eq!(metrics.interest_level, 50.0);
}

#[test]
fn given_small_negative_share_when_aggregating_then_hesitation_but_not_stress() {
    let mut segments: Vec<TranscriptSegment> =
        (0..7).map(|i| scored(i, Sentiment::Positive, 70.0)).collect();
    segments.push(scored(7, Sentiment::Negative, 70.0));
    segments.push(scored(8, Sentiment::Negative, 70.0));

    let metrics = aggregate(&segments);

    // 2 of 9 negative: above the 20% hesitation line, below the 30% stress line.
    assert!(metrics.hesitation_detected);
    assert!(!metrics.stress_detected);
}

#[test]
fn given_enthusiasm_inputs_when_aggregating_then_uses_confidence_and_fluency_mean() {
    let mut a = segment(0, Speaker::Candidate, "answer");
    a.confidence = Some(80.0);
    a.fluency = Some(60.0);

    let metrics = aggregate(&[a]);

    assert_eq!(metrics.enthusiasm_score, 70.0);
}

#[test]
fn given_candidate_questions_when_aggregating_then_collects_them_with_timestamps() {
    let mut q = segment(0, Speaker::Candidate, "what does the roadmap look like");
    q.is_question = true;
    q.question_text = Some("What does the roadmap look like?".to_string());
    let mut interviewer_q = segment(1, Speaker::Interviewer, "why this role");
    interviewer_q.is_question = true;

    let metrics = aggregate(&[q.clone(), interviewer_q]);

    assert_eq!(metrics.candidate_questions.len(), 1);
    assert_eq!(
        metrics.candidate_questions[0].text,
        "What does the roadmap look like?"
    );
    assert_eq!(metrics.candidate_questions[0].timestamp, q.timestamp);
}

#[test]
fn given_high_and_low_averages_when_aggregating_then_reports_strengths_and_concerns() {
    let mut a = segment(0, Speaker::Candidate, "answer");
    a.clarity = Some(90.0);
    a.confidence = Some(30.0);
    a.fluency = Some(60.0);
    a.professionalism = Some(60.0);

    let metrics = aggregate(&[a]);

    assert!(metrics.strengths.iter().any(|s| s.contains("clarity")));
    assert!(metrics.concerns.iter().any(|c| c.contains("confidence")));
}

#[test]
fn given_no_dimension_above_threshold_when_aggregating_then_best_dimension_is_relative_strength() {
    let mut a = segment(0, Speaker::Candidate, "answer");
    a.clarity = Some(65.0);
    a.confidence = Some(60.0);
    a.fluency = Some(55.0);
    a.professionalism = Some(50.0);

    let metrics = aggregate(&[a]);

    assert_eq!(metrics.strengths.len(), 1);
    assert!(metrics.strengths[0].contains("clarity"));
    assert!(metrics.strengths[0].contains("Relative strength"));
}
