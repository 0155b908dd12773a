use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::{ChunkSummary, RawSegment, Sentiment};

/// Estimated speaking rate used by the plain-text fallback, words per second.
const FALLBACK_WORDS_PER_SECOND: f64 = 2.0;
const FALLBACK_SPEAKER_LABEL: &str = "Speaker 1";

/// What the analysis engine actually sent back: either the structured JSON
/// object it was asked for, or free text that had to be segmented locally.
#[derive(Debug)]
pub enum EngineResponse {
    Structured {
        segments: Vec<RawSegment>,
        chunk_summary: Option<ChunkSummary>,
        overall_analysis: Option<String>,
    },
    PlainText {
        segments: Vec<RawSegment>,
    },
}

impl EngineResponse {
    pub fn into_parts(self) -> (Vec<RawSegment>, Option<ChunkSummary>, Option<String>) {
        match self {
            EngineResponse::Structured {
                segments,
                chunk_summary,
                overall_analysis,
            } => (segments, chunk_summary, overall_analysis),
            EngineResponse::PlainText { segments } => (segments, None, None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawTranscription {
    #[serde(default)]
    segments: Vec<RawTranscriptionSegment>,
    #[serde(default)]
    chunk_summary: Option<RawChunkSummary>,
    #[serde(default)]
    overall_analysis: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTranscriptionSegment {
    #[serde(default)]
    speaker: Option<String>,
    #[serde(default)]
    start_time: f64,
    #[serde(default)]
    end_time: f64,
    #[serde(default)]
    text: String,
    #[serde(default)]
    sentiment: Option<String>,
    #[serde(default)]
    sentiment_score: Option<f64>,
    #[serde(default)]
    clarity: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    fluency: Option<f64>,
    #[serde(default)]
    professionalism: Option<f64>,
    #[serde(default)]
    is_question: bool,
    #[serde(default)]
    question_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawChunkSummary {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    key_topics: Vec<String>,
    #[serde(default)]
    key_questions: Vec<String>,
}

/// Parse an engine response. Structured parsing is attempted first; any
/// failure falls through to plain-text segmentation, which always yields a
/// well-formed segment list.
pub fn parse_engine_response(raw: &str) -> EngineResponse {
    let cleaned = strip_code_fences(raw);

    if let Some(json_slice) = extract_json_object(cleaned) {
        match serde_json::from_str::<RawTranscription>(json_slice) {
            Ok(parsed) => {
                if parsed.segments.is_empty() {
                    tracing::warn!("Engine returned a structured response with no segments");
                }
                return EngineResponse::Structured {
                    segments: convert_segments(parsed.segments),
                    chunk_summary: parsed.chunk_summary.map(|s| {
                        let mut summary = ChunkSummary {
                            summary: s.summary,
                            key_topics: s.key_topics,
                            key_questions: s.key_questions,
                        };
                        summary.truncate_to_limits();
                        summary
                    }),
                    overall_analysis: parsed.overall_analysis.filter(|s| !s.trim().is_empty()),
                };
            }
            Err(e) => {
                tracing::warn!(error = %e, "Engine response not parseable as JSON, using plain-text fallback");
            }
        }
    }

    EngineResponse::PlainText {
        segments: segments_from_plain_text(cleaned),
    }
}

fn convert_segments(raw: Vec<RawTranscriptionSegment>) -> Vec<RawSegment> {
    raw.into_iter()
        .filter(|s| !s.text.trim().is_empty())
        .map(|s| {
            let mut segment = RawSegment::new(
                s.speaker.unwrap_or_else(|| FALLBACK_SPEAKER_LABEL.to_string()),
                s.start_time.max(0.0),
                s.end_time,
                s.text.trim().to_string(),
            );
            segment.sentiment = s.sentiment.and_then(|v| v.parse::<Sentiment>().ok());
            segment.sentiment_score = s.sentiment_score;
            segment.clarity = s.clarity;
            segment.confidence = s.confidence;
            segment.fluency = s.fluency;
            segment.professionalism = s.professionalism;
            segment.is_question = s.is_question;
            segment.question_text = s.question_text.filter(|q| !q.trim().is_empty());
            segment.clamp_scores();
            segment
        })
        .collect()
}

/// Degraded mode: sentence-split free text, one default speaker, durations
/// estimated from word count, neutral default scores.
pub fn segments_from_plain_text(text: &str) -> Vec<RawSegment> {
    let mut segments = Vec::new();
    let mut current_time = 0.0;

    for sentence in split_sentences(text) {
        let words = sentence.unicode_words().count();
        if words == 0 {
            continue;
        }
        let duration = (words as f64 / FALLBACK_WORDS_PER_SECOND).max(1.0);

        let mut segment = RawSegment::new(
            FALLBACK_SPEAKER_LABEL.to_string(),
            current_time,
            current_time + duration,
            sentence,
        );
        segment.sentiment = Some(Sentiment::Neutral);
        segment.sentiment_score = Some(50.0);
        segment.clarity = Some(75.0);
        segment.confidence = Some(70.0);
        segment.fluency = Some(75.0);
        segment.professionalism = Some(75.0);

        segments.push(segment);
        current_time += duration;
    }

    segments
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let boundary = chars.peek().map(|c| c.is_whitespace()).unwrap_or(true);
            if boundary {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    sentences.push(trimmed.to_string());
                }
                current.clear();
            }
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// Remove a surrounding markdown code fence, with or without a language tag.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line, if any.
    match body.split_once('\n') {
        Some((first_line, remainder)) if first_line.trim().chars().all(|c| c.is_alphanumeric()) => {
            remainder.trim()
        }
        _ => body.trim(),
    }
}

/// Locate the outermost JSON object in possibly chatty model output.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
