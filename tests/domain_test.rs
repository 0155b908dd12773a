use std::str::FromStr;

use callscribe::domain::{
    CallMetadata, CallResult, CandidateStub, Sentiment, Speaker, TaskId, TaskStage, TaskState,
    TaskStatus, TranscriptSegment, TranscriptStatistics,
};

#[test]
fn given_stages_when_reading_progress_then_fixed_percentages_apply() {
    assert_eq!(TaskStage::Preprocessing.progress(), 10);
    assert_eq!(TaskStage::Transcription.progress(), 30);
    assert_eq!(TaskStage::Normalization.progress(), 50);
    assert_eq!(TaskStage::Chunking.progress(), 80);
    assert_eq!(TaskStage::Completed.progress(), 100);
}

#[test]
fn given_state_strings_when_parsing_then_round_trips() {
    for state in [
        TaskState::Pending,
        TaskState::Processing,
        TaskState::Success,
        TaskState::Failed,
    ] {
        assert_eq!(TaskState::from_str(state.as_str()), Ok(state));
    }
    assert!(TaskState::from_str("bogus").is_err());
    assert!(TaskState::Success.is_terminal());
    assert!(!TaskState::Processing.is_terminal());
}

#[test]
fn given_speaker_and_sentiment_strings_when_parsing_then_round_trips() {
    assert_eq!(Speaker::from_str("candidate"), Ok(Speaker::Candidate));
    assert_eq!(Speaker::from_str("interviewer"), Ok(Speaker::Interviewer));
    assert!(Speaker::from_str("Speaker 1").is_err());

    assert_eq!(Sentiment::from_str("Positive"), Ok(Sentiment::Positive));
    assert_eq!(Sentiment::from_str("NEGATIVE"), Ok(Sentiment::Negative));
    assert!(Sentiment::from_str("meh").is_err());
}

#[test]
fn given_inverted_times_when_building_segment_then_end_is_clamped_to_start() {
    let segment = TranscriptSegment::new(0, Speaker::Candidate, 5.0, 3.0, "text".to_string());

    assert_eq!(segment.end_time, 5.0);
    assert_eq!(segment.duration(), 0.0);
}

#[test]
fn given_out_of_range_scores_when_clamping_then_all_bounds_hold() {
    let mut segment = TranscriptSegment::new(0, Speaker::Candidate, 0.0, 1.0, "text".to_string());
    segment.sentiment_score = Some(-500.0);
    segment.clarity = Some(300.0);
    segment.professionalism = Some(-1.0);

    segment.clamp_scores();

    assert_eq!(segment.sentiment_score, Some(-100.0));
    assert_eq!(segment.clarity, Some(100.0));
    assert_eq!(segment.professionalism, Some(0.0));
}

#[test]
fn given_segments_when_computing_statistics_then_totals_and_breakdown_match() {
    let mut a = TranscriptSegment::new(0, Speaker::Candidate, 0.0, 2.0, "one two three".to_string());
    a.timestamp = "00:00".to_string();
    let mut b = TranscriptSegment::new(1, Speaker::Interviewer, 3.0, 4.5, "four five".to_string());
    b.timestamp = "00:03".to_string();

    let stats = TranscriptStatistics::from_segments(&[a, b]);

    assert_eq!(stats.total_segments, 2);
    assert_eq!(stats.total_words, 5);
    assert_eq!(stats.total_duration, 4.5);
    assert_eq!(stats.speaker_breakdown["candidate"].segments, 1);
    assert_eq!(stats.speaker_breakdown["candidate"].words, 3);
    assert_eq!(stats.speaker_breakdown["interviewer"].duration, 1.5);
}

#[test]
fn given_call_result_when_serializing_then_round_trips_through_json() {
    let task_id = TaskId::new();
    let mut result = CallResult::new(
        task_id,
        CallMetadata {
            filename: "call.wav".to_string(),
            language: "en-IN".to_string(),
            diarization_enabled: true,
        },
        CandidateStub {
            candidate_id: 1,
            job_id: 2,
        },
    );
    result.mark_success();

    let json = serde_json::to_string(&result).expect("serializes");
    let parsed: CallResult = serde_json::from_str(&json).expect("deserializes");

    assert_eq!(parsed.task_id, task_id);
    assert_eq!(parsed.state, TaskState::Success);
    assert_eq!(parsed.metadata.filename, "call.wav");
    assert!(parsed.completed_at.is_some());
}

#[test]
fn given_task_status_constructors_when_building_then_state_and_progress_agree() {
    let task_id = TaskId::new();

    let pending = TaskStatus::pending(task_id);
    assert_eq!(pending.progress, 0);

    let processing = TaskStatus::processing(task_id, TaskStage::Transcription);
    assert_eq!(processing.state, TaskState::Processing);
    assert_eq!(processing.progress, 30);

    let failed = TaskStatus::failed(task_id, TaskStage::Chunking, "boom".to_string());
    assert_eq!(failed.state, TaskState::Failed);
    assert_eq!(failed.error.as_deref(), Some("boom"));

    let json = serde_json::to_string(&failed).expect("serializes");
    let parsed: TaskStatus = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(parsed, failed);
}
