use callscribe::application::services::{merge, merge_short_fillers};
use callscribe::domain::{Speaker, TranscriptSegment};

fn segment(id: usize, speaker: Speaker, start: f64, end: f64, text: &str) -> TranscriptSegment {
    TranscriptSegment::new(id, speaker, start, end, text.to_string())
}

#[test]
fn given_scores_on_opposite_sides_when_merging_then_averages_with_absent_as_zero() {
    let mut a = segment(0, Speaker::Candidate, 0.0, 1.0, "yes");
    a.clarity = Some(80.0);
    let mut b = segment(1, Speaker::Candidate, 1.1, 1.5, "exactly");
    b.confidence = Some(60.0);

    let merged = merge(a, b);

    // (80 + 0) / 2 and (0 + 60) / 2: the absent side counts as zero.
    assert_eq!(merged.clarity, Some(40.0));
    assert_eq!(merged.confidence, Some(30.0));
}

#[test]
fn given_score_absent_from_both_sides_when_merging_then_field_is_zero_not_missing() {
    let a = segment(0, Speaker::Candidate, 0.0, 1.0, "yes");
    let b = segment(1, Speaker::Candidate, 1.1, 1.5, "right");

    let merged = merge(a, b);

    assert_eq!(merged.fluency, Some(0.0));
    assert_eq!(merged.professionalism, Some(0.0));
    assert_eq!(merged.sentiment_score, Some(0.0));
}

#[test]
fn given_scores_on_both_sides_when_merging_then_averages_them() {
    let mut a = segment(0, Speaker::Candidate, 0.0, 1.0, "yes");
    a.clarity = Some(90.0);
    let mut b = segment(1, Speaker::Candidate, 1.1, 1.5, "sure");
    b.clarity = Some(70.0);

    let merged = merge(a, b);

    assert_eq!(merged.clarity, Some(80.0));
}

#[test]
fn given_question_flags_when_merging_then_or_combines_and_first_question_text_wins() {
    let mut a = segment(0, Speaker::Candidate, 0.0, 1.0, "what about the team");
    a.is_question = true;
    a.question_text = Some("What about the team?".to_string());
    let mut b = segment(1, Speaker::Candidate, 1.1, 1.5, "I mean size");
    b.is_question = true;
    b.question_text = Some("How big is it?".to_string());

    let merged = merge(a, b);

    assert!(merged.is_question);
    assert_eq!(merged.question_text.as_deref(), Some("What about the team?"));
}

#[test]
fn given_short_same_speaker_followup_when_folding_then_merges_into_predecessor() {
    let segments = vec![
        segment(0, Speaker::Candidate, 0.0, 2.0, "I led the migration project end to end"),
        segment(1, Speaker::Candidate, 2.1, 2.4, "yeah"),
        segment(2, Speaker::Interviewer, 3.0, 4.0, "tell me more about that"),
    ];

    let merged = merge_short_fillers(segments);

    assert_eq!(merged.len(), 2);
    assert_eq!(
        merged[0].text,
        "I led the migration project end to end yeah"
    );
    assert_eq!(merged[0].end_time, 2.4);
}

#[test]
fn given_long_same_speaker_followup_when_folding_then_keeps_segments_separate() {
    let segments = vec![
        segment(0, Speaker::Candidate, 0.0, 2.0, "short intro"),
        segment(
            1,
            Speaker::Candidate,
            2.1,
            6.0,
            "a much longer substantive answer that stands on its own",
        ),
    ];

    let merged = merge_short_fillers(segments);

    assert_eq!(merged.len(), 2);
}

#[test]
fn given_short_followup_from_other_speaker_when_folding_then_does_not_merge() {
    let segments = vec![
        segment(0, Speaker::Candidate, 0.0, 2.0, "I worked mostly on backend services"),
        segment(1, Speaker::Interviewer, 2.1, 2.3, "ok"),
    ];

    let merged = merge_short_fillers(segments);

    assert_eq!(merged.len(), 2);
}

#[test]
fn given_merged_output_when_folding_then_segment_ids_are_resequenced() {
    let segments = vec![
        segment(0, Speaker::Candidate, 0.0, 2.0, "the first answer with enough words here"),
        segment(1, Speaker::Candidate, 2.1, 2.2, "yes"),
        segment(2, Speaker::Interviewer, 3.0, 4.0, "and the next question then"),
    ];

    let merged = merge_short_fillers(segments);

    let ids: Vec<usize> = merged.iter().map(|s| s.segment_id).collect();
    assert_eq!(ids, vec![0, 1]);
}
