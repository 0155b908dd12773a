use crate::domain::TranscriptSegment;

/// Segments shorter than this many characters are treated as likely filler
/// and folded into the preceding same-speaker turn.
pub const SHORT_SEGMENT_CHARS: usize = 30;

/// Conservative second merge pass: folds very short same-speaker segments
/// into their predecessor, averaging score fields instead of overwriting
/// them.
pub fn merge_short_fillers(segments: Vec<TranscriptSegment>) -> Vec<TranscriptSegment> {
    let initial = segments.len();
    let mut merged: Vec<TranscriptSegment> = Vec::with_capacity(segments.len());

    for segment in segments {
        let fold_into_previous = matches!(
            merged.last(),
            Some(current)
                if current.speaker == segment.speaker
                    && segment.text.chars().count() < SHORT_SEGMENT_CHARS
        );
        if fold_into_previous {
            let previous = merged.pop().expect("just matched a last element");
            merged.push(merge(previous, segment));
        } else {
            merged.push(segment);
        }
    }

    for (index, segment) in merged.iter_mut().enumerate() {
        segment.segment_id = index;
    }

    if merged.len() != initial {
        tracing::debug!(
            before = initial,
            after = merged.len(),
            "Folded short filler segments"
        );
    }

    merged
}

/// Pure merge of two adjacent same-speaker segments. Every numeric score
/// field present on either side is averaged, treating an absent value as 0;
/// a field absent from both is kept as 0 so downstream aggregation never
/// sees a missing key.
pub fn merge(a: TranscriptSegment, b: TranscriptSegment) -> TranscriptSegment {
    let mut out = a;

    if !b.text.is_empty() {
        if !out.text.is_empty() {
            out.text.push(' ');
        }
        out.text.push_str(&b.text);
    }
    out.end_time = b.end_time.max(out.end_time);

    out.sentiment_score = average_scores(out.sentiment_score, b.sentiment_score);
    out.clarity = average_scores(out.clarity, b.clarity);
    out.confidence = average_scores(out.confidence, b.confidence);
    out.fluency = average_scores(out.fluency, b.fluency);
    out.professionalism = average_scores(out.professionalism, b.professionalism);

    // Categorical sentiment has no meaningful average; the first segment's
    // value stands unless it had none.
    out.sentiment = out.sentiment.or(b.sentiment);

    out.is_question = out.is_question || b.is_question;
    out.question_text = out
        .question_text
        .filter(|q| !q.is_empty())
        .or(b.question_text.filter(|q| !q.is_empty()));

    out
}

fn average_scores(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some((a.unwrap_or(0.0) + b.unwrap_or(0.0)) / 2.0)
}
