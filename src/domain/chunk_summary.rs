use serde::{Deserialize, Serialize};

pub const MAX_KEY_TOPICS: usize = 10;
pub const MAX_KEY_QUESTIONS: usize = 10;

/// Per-transcription-window summary, used only as an input to the final
/// summary reduction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkSummary {
    pub summary: String,
    #[serde(default)]
    pub key_topics: Vec<String>,
    #[serde(default)]
    pub key_questions: Vec<String>,
}

impl ChunkSummary {
    pub fn truncate_to_limits(&mut self) {
        self.key_topics.truncate(MAX_KEY_TOPICS);
        self.key_questions.truncate(MAX_KEY_QUESTIONS);
    }
}
