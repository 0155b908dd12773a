use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub redis: RedisSettings,
    pub audio: AudioSettings,
    pub chunking: ChunkingSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EngineSettings {
    /// Credential for the external analysis engine. Missing keys fail at
    /// bootstrap with a configuration error, never mid-pipeline.
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    pub url: String,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub max_file_size_mb: usize,
    pub noise_reduction: bool,
    pub trim_silence: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: 200,
            noise_reduction: true,
            trim_silence: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub max_tokens: usize,
    pub overlap_tokens: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            overlap_tokens: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub max_retries: u32,
    pub retry_backoff_secs: u64,
    pub time_budget_secs: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_backoff_secs: 60,
            time_budget_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
