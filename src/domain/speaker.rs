use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic role of a speaker turn. Raw diarization labels are mapped onto
/// exactly these two roles during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Candidate,
    Interviewer,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Candidate => "candidate",
            Speaker::Interviewer => "interviewer",
        }
    }
}

impl FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(Speaker::Candidate),
            "interviewer" => Ok(Speaker::Interviewer),
            _ => Err(format!("Invalid speaker role: {}", s)),
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
