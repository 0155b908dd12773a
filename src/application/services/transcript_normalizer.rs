use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{RawSegment, Speaker, TranscriptSegment, TranscriptStatistics};

/// Maximum same-speaker gap, in seconds, that still merges two turns.
pub const DEFAULT_GAP_THRESHOLD: f64 = 1.0;

static FILLER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // Multi-word phrases first so they are consumed whole.
    Regex::new(
        r"(?i)\b(?:you know|i mean|sort of|kind of|umm|uhh|ahh|err|uh|um|ah|like|basically|actually)\b",
    )
    .expect("filler pattern is a valid regex")
});

static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?;:])").expect("punctuation pattern is a valid regex"));

/// Canonical casing for domain vocabulary, longest match first so multi-word
/// terms win over their substrings.
static TECH_TERMS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let mut terms: Vec<(&str, &str)> = vec![
        ("python", "Python"),
        ("javascript", "JavaScript"),
        ("java script", "JavaScript"),
        ("typescript", "TypeScript"),
        ("react js", "React"),
        ("react", "React"),
        ("angular", "Angular"),
        ("vue", "Vue"),
        ("node js", "Node.js"),
        ("nodejs", "Node.js"),
        ("node", "Node.js"),
        ("django", "Django"),
        ("flask", "Flask"),
        ("fast api", "FastAPI"),
        ("fastapi", "FastAPI"),
        ("mysql", "MySQL"),
        ("postgresql", "PostgreSQL"),
        ("postgres", "PostgreSQL"),
        ("mongo db", "MongoDB"),
        ("mongodb", "MongoDB"),
        ("redis", "Redis"),
        ("sql", "SQL"),
        ("docker", "Docker"),
        ("kubernetes", "Kubernetes"),
        ("k8s", "Kubernetes"),
        ("aws", "AWS"),
        ("azure", "Azure"),
        ("google cloud", "GCP"),
        ("gcp", "GCP"),
        ("machine learning", "Machine Learning"),
        ("ml", "Machine Learning"),
        ("artificial intelligence", "AI"),
        ("deep learning", "Deep Learning"),
        ("data science", "Data Science"),
        ("devops", "DevOps"),
        ("ci cd", "CI/CD"),
        ("cicd", "CI/CD"),
        ("rest api", "REST API"),
        ("restful", "RESTful"),
        ("api", "API"),
        ("graphql", "GraphQL"),
        ("github", "GitHub"),
        ("gitlab", "GitLab"),
        ("git", "Git"),
    ];
    terms.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    terms
        .into_iter()
        .map(|(term, canonical)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(term));
            (
                Regex::new(&pattern).expect("tech term pattern is a valid regex"),
                canonical,
            )
        })
        .collect()
});

fn number_word(word: &str) -> Option<u32> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        "hundred" => 100,
        "thousand" => 1000,
        _ => return None,
    };
    Some(value)
}

pub struct NormalizationOutput {
    pub segments: Vec<TranscriptSegment>,
    pub statistics: TranscriptStatistics,
}

/// Cleans raw engine segments into the final transcript: gap-merging,
/// filler removal, number and vocabulary normalization, role mapping and
/// per-call statistics. Running it on its own output is a no-op.
pub struct TranscriptNormalizer {
    gap_threshold: f64,
}

impl Default for TranscriptNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_GAP_THRESHOLD)
    }
}

impl TranscriptNormalizer {
    pub fn new(gap_threshold: f64) -> Self {
        Self { gap_threshold }
    }

    pub fn normalize(&self, raw_segments: Vec<RawSegment>) -> NormalizationOutput {
        let initial = raw_segments.len();

        let mut merged = self.merge_close_segments(raw_segments);
        for segment in &mut merged {
            segment.text = clean_text(&segment.text);
        }
        merged.retain(|s| !s.text.trim().is_empty());
        // Dropping filler-only segments can bring two same-speaker turns back
        // within the gap threshold; a second pass closes those.
        let merged = self.merge_close_segments(merged);

        let roles = map_speaker_roles(&merged);
        let segments: Vec<TranscriptSegment> = merged
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let speaker = roles
                    .get(&raw.speaker_label)
                    .copied()
                    .unwrap_or(Speaker::Candidate);
                let mut segment =
                    TranscriptSegment::new(index, speaker, raw.start_time, raw.end_time, raw.text);
                segment.timestamp = format_timestamp(raw.start_time);
                segment.sentiment = raw.sentiment;
                segment.sentiment_score = raw.sentiment_score;
                segment.clarity = raw.clarity;
                segment.confidence = raw.confidence;
                segment.fluency = raw.fluency;
                segment.professionalism = raw.professionalism;
                segment.is_question = raw.is_question;
                segment.question_text = raw.question_text;
                segment
            })
            .collect();

        tracing::info!(
            raw_segments = initial,
            normalized_segments = segments.len(),
            "Transcript normalization completed"
        );

        let statistics = TranscriptStatistics::from_segments(&segments);
        NormalizationOutput {
            segments,
            statistics,
        }
    }

    fn merge_close_segments(&self, segments: Vec<RawSegment>) -> Vec<RawSegment> {
        let mut merged: Vec<RawSegment> = Vec::with_capacity(segments.len());

        for segment in segments {
            if let Some(current) = merged.last_mut() {
                let same_speaker = current.speaker_label == segment.speaker_label;
                let gap = segment.start_time - current.end_time;
                if same_speaker && gap <= self.gap_threshold {
                    current.end_time = segment.end_time.max(current.end_time);
                    if !segment.text.is_empty() {
                        if !current.text.is_empty() {
                            current.text.push(' ');
                        }
                        current.text.push_str(&segment.text);
                    }
                    continue;
                }
            }
            merged.push(segment);
        }

        merged
    }
}

/// Raw diarization labels mapped onto the two semantic roles. Labels that
/// already name a role keep it; otherwise the first distinct label becomes
/// the candidate, the second the interviewer, and anything further defaults
/// to candidate.
fn map_speaker_roles(segments: &[RawSegment]) -> HashMap<String, Speaker> {
    let mut roles: HashMap<String, Speaker> = HashMap::new();
    let mut positional = 0usize;

    for segment in segments {
        if roles.contains_key(&segment.speaker_label) {
            continue;
        }
        let lower = segment.speaker_label.to_lowercase();
        let role = if lower.contains("interviewer") {
            Speaker::Interviewer
        } else if lower.contains("candidate") {
            Speaker::Candidate
        } else {
            let assigned = match positional {
                0 => Speaker::Candidate,
                1 => Speaker::Interviewer,
                _ => Speaker::Candidate,
            };
            positional += 1;
            assigned
        };
        roles.insert(segment.speaker_label.clone(), role);
    }

    roles
}

pub fn clean_text(text: &str) -> String {
    let without_fillers = FILLER_PATTERN.replace_all(text, "");
    let with_digits = normalize_numbers(&without_fillers);
    let standardized = standardize_terms(&with_digits);
    tidy(&standardized)
}

fn normalize_numbers(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let (prefix, core, suffix) = split_punctuation(words[i]);
        if let Some(first) = number_word(&core.to_lowercase()) {
            // Simple compounds: a round tens word followed by a unit.
            if i + 1 < words.len() {
                let (_, next_core, next_suffix) = split_punctuation(words[i + 1]);
                if let Some(second) = number_word(&next_core.to_lowercase()) {
                    if first >= 20 && first % 10 == 0 && second < 10 {
                        out.push(format!("{}{}{}", prefix, first + second, next_suffix));
                        i += 2;
                        continue;
                    }
                }
            }
            out.push(format!("{}{}{}", prefix, first, suffix));
        } else {
            out.push(words[i].to_string());
        }
        i += 1;
    }

    out.join(" ")
}

fn split_punctuation(word: &str) -> (&str, &str, &str) {
    let is_punct = |c: char| matches!(c, '.' | ',' | '!' | '?');
    let start = word.find(|c| !is_punct(c)).unwrap_or(word.len());
    let end = word.rfind(|c| !is_punct(c)).map(|i| i + 1).unwrap_or(start);
    (&word[..start], &word[start..end], &word[end..])
}

fn standardize_terms(text: &str) -> String {
    let mut result = text.to_string();
    for (pattern, canonical) in TECH_TERMS.iter() {
        result = replace_term(&result, pattern, canonical);
    }
    result
}

fn replace_term(haystack: &str, pattern: &Regex, canonical: &str) -> String {
    pattern
        .replace_all(haystack, |caps: &regex::Captures| {
            let m = caps.get(0).expect("group 0 always present");
            // Leave text alone when it already reads as the canonical form,
            // so re-normalizing never stacks suffixes ("Node.js.js").
            if haystack[m.start()..].starts_with(canonical) {
                m.as_str().to_string()
            } else {
                canonical.to_string()
            }
        })
        .into_owned()
}

fn tidy(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let fixed = SPACE_BEFORE_PUNCT.replace_all(&collapsed, "$1");
    let trimmed = fixed.trim();

    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `MM:SS`, or `HH:MM:SS` once the call passes an hour.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
