mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AudioSettings, ChunkingSettings, EngineSettings, LoggingSettings, PipelineSettings,
    RedisSettings, Settings,
};
