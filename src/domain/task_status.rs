use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Pending,
    Processing,
    Success,
    Failed,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Pending => "pending",
            TaskState::Processing => "processing",
            TaskState::Success => "success",
            TaskState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failed)
    }
}

impl FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskState::Pending),
            "processing" => Ok(TaskState::Processing),
            "success" => Ok(TaskState::Success),
            "failed" => Ok(TaskState::Failed),
            _ => Err(format!("Invalid task state: {}", s)),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pipeline stages in fixed order, each with its reported progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStage {
    Preprocessing,
    Transcription,
    Normalization,
    Chunking,
    Completed,
}

impl TaskStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStage::Preprocessing => "preprocessing",
            TaskStage::Transcription => "transcription",
            TaskStage::Normalization => "normalization",
            TaskStage::Chunking => "chunking",
            TaskStage::Completed => "completed",
        }
    }

    pub fn progress(&self) -> u8 {
        match self {
            TaskStage::Preprocessing => 10,
            TaskStage::Transcription => 30,
            TaskStage::Normalization => 50,
            TaskStage::Chunking => 80,
            TaskStage::Completed => 100,
        }
    }
}

impl fmt::Display for TaskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lightweight polling state, overwritten in place on every stage
/// transition. Separate from the full `CallResult`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub task_id: TaskId,
    pub state: TaskState,
    pub stage: TaskStage,
    pub progress: u8,
    #[serde(default)]
    pub error: Option<String>,
}

impl TaskStatus {
    pub fn pending(task_id: TaskId) -> Self {
        Self {
            task_id,
            state: TaskState::Pending,
            stage: TaskStage::Preprocessing,
            progress: 0,
            error: None,
        }
    }

    pub fn processing(task_id: TaskId, stage: TaskStage) -> Self {
        Self {
            task_id,
            state: TaskState::Processing,
            stage,
            progress: stage.progress(),
            error: None,
        }
    }

    pub fn success(task_id: TaskId) -> Self {
        Self {
            task_id,
            state: TaskState::Success,
            stage: TaskStage::Completed,
            progress: TaskStage::Completed.progress(),
            error: None,
        }
    }

    pub fn failed(task_id: TaskId, stage: TaskStage, error: String) -> Self {
        Self {
            task_id,
            state: TaskState::Failed,
            stage,
            progress: stage.progress(),
            error: Some(error),
        }
    }
}
