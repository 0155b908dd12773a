use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::application::ports::{AnalysisEngine, AnalysisEngineError, AudioError};
use crate::domain::{ChunkSummary, RawSegment, MAX_KEY_QUESTIONS, MAX_KEY_TOPICS};

use super::engine_response::{extract_json_object, parse_engine_response, strip_code_fences};
use super::wav::split_into_windows;

const TRANSCRIPTION_INSTRUCTION: &str = "\
Transcribe this interview call and return a single JSON object, no prose, \
with this shape: {\"segments\": [{\"speaker\": \"candidate\"|\"interviewer\", \
\"start_time\": seconds, \"end_time\": seconds, \"text\": \"...\", \
\"sentiment\": \"positive\"|\"neutral\"|\"negative\", \"sentiment_score\": -100..100, \
\"clarity\": 0..100, \"confidence\": 0..100, \"fluency\": 0..100, \
\"professionalism\": 0..100, \"is_question\": bool, \"question_text\": \"...\"|null}], \
\"chunk_summary\": {\"summary\": \"...\", \"key_topics\": [..], \"key_questions\": [..]}, \
\"overall_analysis\": \"...\"}. \
Segment on speaker turns, keep timestamps monotonic, include every spoken word.";

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Above this size the audio is split into windows.
    pub single_call_limit_bytes: usize,
    /// Payload bytes per window, header excluded.
    pub window_payload_bytes: usize,
    pub max_attempts: u32,
    pub backoff_base: Duration,
    /// Fraction of segments missing quality scores that triggers the
    /// best-effort annotation call.
    pub annotation_threshold: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            single_call_limit_bytes: 15 * 1024 * 1024,
            window_payload_bytes: 10 * 1024 * 1024,
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            annotation_threshold: 0.5,
        }
    }
}

#[derive(Debug)]
pub struct TranscriptionOutput {
    pub segments: Vec<RawSegment>,
    pub chunk_summaries: Vec<ChunkSummary>,
    pub final_summary: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("engine: {0}")]
    Engine(#[from] AnalysisEngineError),
    #[error("audio windowing: {0}")]
    Audio(#[from] AudioError),
}

impl TranscriptionError {
    pub fn is_transient(&self) -> bool {
        match self {
            TranscriptionError::Engine(e) => e.is_transient(),
            TranscriptionError::Audio(_) => false,
        }
    }
}

/// Drives the external analysis engine: one call for small audio, windowed
/// calls with timestamp reconciliation for large audio, then summary
/// reduction over the per-window summaries.
pub struct TranscriptionOrchestrator {
    engine: Arc<dyn AnalysisEngine>,
    config: OrchestratorConfig,
}

impl TranscriptionOrchestrator {
    pub fn new(engine: Arc<dyn AnalysisEngine>, config: OrchestratorConfig) -> Self {
        Self { engine, config }
    }

    pub async fn transcribe(
        &self,
        wav_bytes: &[u8],
    ) -> Result<TranscriptionOutput, TranscriptionError> {
        let (mut segments, chunk_summaries, overall) =
            if wav_bytes.len() <= self.config.single_call_limit_bytes {
                self.transcribe_single(wav_bytes).await?
            } else {
                self.transcribe_windowed(wav_bytes).await?
            };

        // Window calls may interleave at boundaries; the final timeline must
        // be ordered by start time with sequential ids.
        segments.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        self.annotate_missing_scores(&mut segments).await;

        let final_summary = match overall {
            Some(text) if chunk_summaries.len() <= 1 => text,
            _ => self.reduce_summaries(&chunk_summaries).await,
        };

        tracing::info!(
            segments = segments.len(),
            windows = chunk_summaries.len().max(1),
            "Transcription completed"
        );

        Ok(TranscriptionOutput {
            segments,
            chunk_summaries,
            final_summary,
        })
    }

    async fn transcribe_single(
        &self,
        wav_bytes: &[u8],
    ) -> Result<(Vec<RawSegment>, Vec<ChunkSummary>, Option<String>), TranscriptionError> {
        let raw = self.audio_call_with_retry(wav_bytes).await?;
        let (segments, chunk_summary, overall) = parse_engine_response(&raw).into_parts();
        Ok((segments, chunk_summary.into_iter().collect(), overall))
    }

    async fn transcribe_windowed(
        &self,
        wav_bytes: &[u8],
    ) -> Result<(Vec<RawSegment>, Vec<ChunkSummary>, Option<String>), TranscriptionError> {
        let windows = split_into_windows(wav_bytes, self.config.window_payload_bytes)?;
        tracing::info!(
            total_bytes = wav_bytes.len(),
            windows = windows.len(),
            "Audio exceeds single-call limit, transcribing in windows"
        );

        let mut segments: Vec<RawSegment> = Vec::new();
        let mut summaries: Vec<ChunkSummary> = Vec::new();
        let mut time_offset = 0.0;

        for (index, window) in windows.iter().enumerate() {
            let raw = self.audio_call_with_retry(&window.bytes).await?;
            let (mut window_segments, chunk_summary, _) = parse_engine_response(&raw).into_parts();

            for segment in &mut window_segments {
                segment.shift(time_offset);
            }
            segments.extend(window_segments);
            summaries.extend(chunk_summary);

            tracing::debug!(
                window = index + 1,
                window_duration = window.duration,
                cumulative_offset = time_offset,
                "Window transcribed"
            );
            time_offset += window.duration;
        }

        Ok((segments, summaries, None))
    }

    async fn audio_call_with_retry(&self, audio: &[u8]) -> Result<String, AnalysisEngineError> {
        let mut attempt = 1;
        loop {
            match self
                .engine
                .analyze_audio(audio, TRANSCRIPTION_INSTRUCTION)
                .await
            {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    let delay = self.config.backoff_base * 2u32.pow(attempt - 1);
                    tracing::warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient engine failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn text_call_with_retry(&self, prompt: &str) -> Result<String, AnalysisEngineError> {
        let mut attempt = 1;
        loop {
            match self.engine.analyze_text(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    let delay = self.config.backoff_base * 2u32.pow(attempt - 1);
                    tracing::warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient engine failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Reduce per-window summaries into one final summary. The engine call
    /// is best-effort; on failure the local deterministic aggregation is
    /// used so summarization alone can never fail the task.
    async fn reduce_summaries(&self, summaries: &[ChunkSummary]) -> String {
        if summaries.is_empty() {
            return String::new();
        }
        if summaries.len() == 1 && !summaries[0].summary.trim().is_empty() {
            return summaries[0].summary.clone();
        }

        let prompt = build_reduction_prompt(summaries);
        match self.text_call_with_retry(&prompt).await {
            Ok(response) => {
                let text = strip_code_fences(&response).trim().to_string();
                if text.is_empty() {
                    tracing::warn!("Summary reduction returned empty text, using local aggregation");
                    aggregate_summaries_locally(summaries)
                } else {
                    text
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Summary reduction failed, using local aggregation");
                aggregate_summaries_locally(summaries)
            }
        }
    }

    /// When too many segments came back unscored, ask the engine to score
    /// exactly those segments. Strictly best-effort: any failure leaves the
    /// segments as they were.
    async fn annotate_missing_scores(&self, segments: &mut [RawSegment]) {
        if segments.is_empty() {
            return;
        }
        let missing: Vec<usize> = segments
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.has_quality_scores())
            .map(|(i, _)| i)
            .collect();

        let missing_ratio = missing.len() as f64 / segments.len() as f64;
        if missing_ratio <= self.config.annotation_threshold {
            return;
        }

        tracing::info!(
            missing = missing.len(),
            total = segments.len(),
            "Requesting score annotation for unscored segments"
        );

        let prompt = build_annotation_prompt(segments, &missing);
        let response = match self.text_call_with_retry(&prompt).await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "Score annotation failed, keeping default scores");
                return;
            }
        };

        match parse_annotations(&response) {
            Some(annotations) => {
                for annotation in annotations {
                    if let Some(segment) = segments.get_mut(annotation.segment_id) {
                        segment.clarity = annotation.clarity.or(segment.clarity);
                        segment.confidence = annotation.confidence.or(segment.confidence);
                        segment.fluency = annotation.fluency.or(segment.fluency);
                        segment.professionalism =
                            annotation.professionalism.or(segment.professionalism);
                        segment.sentiment_score =
                            annotation.sentiment_score.or(segment.sentiment_score);
                        segment.clamp_scores();
                    }
                }
            }
            None => {
                tracing::warn!("Score annotation response unparsable, keeping default scores");
            }
        }
    }
}

fn build_reduction_prompt(summaries: &[ChunkSummary]) -> String {
    let mut prompt = String::from(
        "Combine these partial interview-call summaries into one concise final \
summary paragraph. Return plain text only.\n",
    );
    for (index, summary) in summaries.iter().enumerate() {
        prompt.push_str(&format!(
            "\nPart {}: {}\nTopics: {}\nQuestions: {}\n",
            index + 1,
            summary.summary,
            summary.key_topics.join(", "),
            summary.key_questions.join("; "),
        ));
    }
    prompt
}

/// Deterministic fallback reduction: concatenated summaries with the
/// deduplicated topics appended, bounded to the usual limits.
fn aggregate_summaries_locally(summaries: &[ChunkSummary]) -> String {
    let mut text = summaries
        .iter()
        .map(|s| s.summary.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut topics: Vec<String> = Vec::new();
    for summary in summaries {
        for topic in &summary.key_topics {
            if topics.len() >= MAX_KEY_TOPICS {
                break;
            }
            if !topics.iter().any(|t| t.eq_ignore_ascii_case(topic)) {
                topics.push(topic.clone());
            }
        }
    }
    if !topics.is_empty() {
        text.push_str(&format!(" Key topics: {}.", topics.join(", ")));
    }

    let mut questions: Vec<String> = Vec::new();
    for summary in summaries {
        for question in &summary.key_questions {
            if questions.len() >= MAX_KEY_QUESTIONS {
                break;
            }
            if !questions.iter().any(|q| q.eq_ignore_ascii_case(question)) {
                questions.push(question.clone());
            }
        }
    }
    if !questions.is_empty() {
        text.push_str(&format!(" Key questions: {}", questions.join("; ")));
    }

    text
}

fn build_annotation_prompt(segments: &[RawSegment], missing: &[usize]) -> String {
    let mut prompt = String::from(
        "Score these interview transcript segments. Return a JSON object \
{\"annotations\": [{\"segment_id\": n, \"clarity\": 0..100, \"confidence\": 0..100, \
\"fluency\": 0..100, \"professionalism\": 0..100, \"sentiment_score\": -100..100}]} \
covering exactly the listed segments.\n",
    );
    for &index in missing {
        prompt.push_str(&format!("\n[{}] {}", index, segments[index].text));
    }
    prompt
}

#[derive(Debug, Deserialize)]
struct AnnotationEnvelope {
    #[serde(default)]
    annotations: Vec<ScoreAnnotation>,
}

#[derive(Debug, Deserialize)]
struct ScoreAnnotation {
    segment_id: usize,
    #[serde(default)]
    clarity: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    fluency: Option<f64>,
    #[serde(default)]
    professionalism: Option<f64>,
    #[serde(default)]
    sentiment_score: Option<f64>,
}

fn parse_annotations(raw: &str) -> Option<Vec<ScoreAnnotation>> {
    let cleaned = strip_code_fences(raw);
    let json_slice = extract_json_object(cleaned)?;
    serde_json::from_str::<AnnotationEnvelope>(json_slice)
        .ok()
        .map(|e| e.annotations)
}
