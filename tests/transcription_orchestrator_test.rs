use std::sync::Arc;
use std::time::Duration;

use callscribe::application::ports::AnalysisEngineError;
use callscribe::application::services::wav::encode_wav_pcm16;
use callscribe::application::services::{OrchestratorConfig, TranscriptionOrchestrator};
use callscribe::infrastructure::llm::MockAnalysisEngine;

fn fast_config() -> OrchestratorConfig {
    OrchestratorConfig {
        backoff_base: Duration::from_millis(1),
        ..OrchestratorConfig::default()
    }
}

fn window_response(label: &str) -> String {
    format!(
        r#"{{"segments": [{{"speaker": "candidate", "start_time": 0.0, "end_time": 5.0, "text": "{label}", "sentiment": "neutral", "sentiment_score": 0, "clarity": 75, "confidence": 75, "fluency": 75, "professionalism": 75}}], "chunk_summary": {{"summary": "{label} summary", "key_topics": ["{label}"], "key_questions": []}}}}"#
    )
}

/// Canonical 16 kHz mono 16-bit WAV of the requested payload size.
fn silent_wav(payload_bytes: usize) -> Vec<u8> {
    encode_wav_pcm16(&vec![0i16; payload_bytes / 2], 16_000, 1)
}

#[tokio::test]
async fn given_small_audio_when_transcribing_then_single_engine_call_is_made() {
    let engine = Arc::new(MockAnalysisEngine::new());
    engine.push_ok(window_response("whole call"));
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(&engine) as _, fast_config());

    let output = orchestrator
        .transcribe(&silent_wav(1024 * 1024))
        .await
        .expect("transcription succeeds");

    assert_eq!(engine.audio_calls(), 1);
    assert_eq!(output.segments.len(), 1);
    assert_eq!(output.chunk_summaries.len(), 1);
    assert_eq!(output.final_summary, "whole call summary");
}

#[tokio::test]
async fn given_25mb_audio_when_transcribing_then_three_windows_with_cumulative_offsets() {
    let engine = Arc::new(MockAnalysisEngine::new());
    engine.push_ok(window_response("window one"));
    engine.push_ok(window_response("window two"));
    engine.push_ok(window_response("window three"));
    engine.push_ok("A full-call summary across all three windows.");
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(&engine) as _, fast_config());

    let wav = silent_wav(25 * 1024 * 1024);
    let output = orchestrator
        .transcribe(&wav)
        .await
        .expect("transcription succeeds");

    assert_eq!(engine.audio_calls(), 3);
    assert_eq!(output.segments.len(), 3);
    assert_eq!(output.chunk_summaries.len(), 3);

    // 10 MB of 16 kHz mono 16-bit payload is 327.68 seconds per window.
    let window_secs = (10 * 1024 * 1024) as f64 / 32_000.0;
    assert!((output.segments[1].start_time - window_secs).abs() < 1e-9);
    assert!((output.segments[2].start_time - 2.0 * window_secs).abs() < 1e-9);

    for pair in output.segments.windows(2) {
        assert!(pair[0].start_time <= pair[1].start_time);
    }

    assert_eq!(
        output.final_summary,
        "A full-call summary across all three windows."
    );
}

#[tokio::test]
async fn given_transient_engine_failure_when_transcribing_then_retries_with_backoff() {
    let engine = Arc::new(MockAnalysisEngine::new());
    engine.push_err(AnalysisEngineError::ApiRequestFailed("status 500".to_string()));
    engine.push_ok(window_response("after retry"));
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(&engine) as _, fast_config());

    let output = orchestrator
        .transcribe(&silent_wav(64 * 1024))
        .await
        .expect("retry recovers the call");

    assert_eq!(engine.audio_calls(), 2);
    assert_eq!(output.segments.len(), 1);
}

#[tokio::test]
async fn given_auth_failure_when_transcribing_then_fails_without_retry() {
    let engine = Arc::new(MockAnalysisEngine::new());
    engine.push_err(AnalysisEngineError::Auth("bad key".to_string()));
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(&engine) as _, fast_config());

    let result = orchestrator.transcribe(&silent_wav(64 * 1024)).await;

    assert!(result.is_err());
    assert_eq!(engine.audio_calls(), 1);
}

#[tokio::test]
async fn given_exhausted_retries_when_transcribing_then_last_transient_error_surfaces() {
    let engine = Arc::new(MockAnalysisEngine::new());
    for _ in 0..3 {
        engine.push_err(AnalysisEngineError::ApiRequestFailed("status 503".to_string()));
    }
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(&engine) as _, fast_config());

    let result = orchestrator.transcribe(&silent_wav(64 * 1024)).await;

    assert!(result.is_err());
    assert_eq!(engine.audio_calls(), 3);
}

#[tokio::test]
async fn given_failed_summary_reduction_when_transcribing_then_local_aggregation_is_used() {
    let engine = Arc::new(MockAnalysisEngine::new());
    engine.push_ok(window_response("part one"));
    engine.push_ok(window_response("part two"));
    // Reduction call fails on every attempt; the pipeline must not.
    for _ in 0..3 {
        engine.push_err(AnalysisEngineError::ApiRequestFailed("status 502".to_string()));
    }
    let orchestrator = TranscriptionOrchestrator::new(
        Arc::clone(&engine) as _,
        OrchestratorConfig {
            single_call_limit_bytes: 128 * 1024,
            window_payload_bytes: 128 * 1024,
            backoff_base: Duration::from_millis(1),
            ..OrchestratorConfig::default()
        },
    );

    let output = orchestrator
        .transcribe(&silent_wav(256 * 1024))
        .await
        .expect("summarization failure must not fail the task");

    assert!(output.final_summary.contains("part one summary"));
    assert!(output.final_summary.contains("part two summary"));
    assert!(output.final_summary.contains("Key topics"));
}

#[tokio::test]
async fn given_plain_text_response_when_transcribing_then_degraded_segments_are_produced() {
    let engine = Arc::new(MockAnalysisEngine::new());
    engine.push_ok("The candidate introduced themselves. They described a recent project.");
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(&engine) as _, fast_config());

    let output = orchestrator
        .transcribe(&silent_wav(64 * 1024))
        .await
        .expect("fallback parsing still succeeds");

    assert_eq!(output.segments.len(), 2);
    assert!(output.segments.iter().all(|s| s.sentiment_score == Some(50.0)));
    assert!(output.chunk_summaries.is_empty());
    assert!(output.final_summary.is_empty());
}

#[tokio::test]
async fn given_mostly_unscored_segments_when_transcribing_then_annotation_call_fills_scores() {
    let engine = Arc::new(MockAnalysisEngine::new());
    engine.push_ok(
        r#"{"segments": [
            {"speaker": "candidate", "start_time": 0, "end_time": 2, "text": "first answer"},
            {"speaker": "candidate", "start_time": 3, "end_time": 5, "text": "second answer"}
        ]}"#,
    );
    engine.push_ok(
        r#"{"annotations": [
            {"segment_id": 0, "clarity": 81, "confidence": 72, "fluency": 76, "professionalism": 88},
            {"segment_id": 1, "clarity": 64, "confidence": 70, "fluency": 69, "professionalism": 77}
        ]}"#,
    );
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(&engine) as _, fast_config());

    let output = orchestrator
        .transcribe(&silent_wav(64 * 1024))
        .await
        .expect("transcription succeeds");

    assert_eq!(engine.text_calls(), 1);
    assert_eq!(output.segments[0].clarity, Some(81.0));
    assert_eq!(output.segments[1].professionalism, Some(77.0));
}

#[tokio::test]
async fn given_failed_annotation_call_when_transcribing_then_segments_keep_missing_scores() {
    let engine = Arc::new(MockAnalysisEngine::new());
    engine.push_ok(
        r#"{"segments": [{"speaker": "candidate", "start_time": 0, "end_time": 2, "text": "only answer"}]}"#,
    );
    for _ in 0..3 {
        engine.push_err(AnalysisEngineError::ApiRequestFailed("status 500".to_string()));
    }
    let orchestrator = TranscriptionOrchestrator::new(Arc::clone(&engine) as _, fast_config());

    let output = orchestrator
        .transcribe(&silent_wav(64 * 1024))
        .await
        .expect("annotation failure must not fail the task");

    assert_eq!(output.segments[0].clarity, None);
}
