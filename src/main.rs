use std::sync::Arc;
use std::time::Duration;

use config::{Config, File};

use callscribe::application::services::{
    OrchestratorConfig, TaskRunner, TaskRunnerConfig, TokenChunker, TranscriptNormalizer,
    TranscriptionOrchestrator, UploadPayload,
};
use callscribe::application::ports::PreprocessOptions;
use callscribe::domain::TaskId;
use callscribe::infrastructure::audio::SymphoniaPreprocessor;
use callscribe::infrastructure::llm::GeminiAnalysisEngine;
use callscribe::infrastructure::observability::{init_tracing, TracingConfig};
use callscribe::infrastructure::persistence::RedisStatusStore;
use callscribe::presentation::{Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    let configuration = Config::builder()
        .add_source(File::with_name(&environment.config_file()).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("_"))
        .build()?;
    let settings: Settings = configuration.try_deserialize()?;

    init_tracing(TracingConfig {
        environment: environment.to_string(),
        json_format: settings.logging.enable_json,
    });

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or_else(|| {
        anyhow::anyhow!("usage: callscribe <audio-file> [candidate-id] [job-id] [language]")
    })?;
    let candidate_id: i64 = args.next().unwrap_or_else(|| "0".into()).parse()?;
    let job_id: i64 = args.next().unwrap_or_else(|| "0".into()).parse()?;
    let language = args.next().unwrap_or_else(|| "en-IN".to_string());

    let bytes = tokio::fs::read(&path).await?;
    let filename = std::path::Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());

    // One dependency graph per worker process; components take their
    // collaborators by parameter.
    let engine = Arc::new(GeminiAnalysisEngine::new(
        &settings.engine.api_key,
        settings.engine.base_url.as_deref(),
        settings.engine.model.as_deref(),
    )?);
    let store = Arc::new(RedisStatusStore::new(&settings.redis.url)?);
    let preprocessor = Arc::new(SymphoniaPreprocessor::new(settings.audio.max_file_size_mb));

    let runner = TaskRunner::new(
        preprocessor,
        TranscriptionOrchestrator::new(engine, OrchestratorConfig::default()),
        TranscriptNormalizer::default(),
        TokenChunker::new(settings.chunking.max_tokens, settings.chunking.overlap_tokens),
        store,
        TaskRunnerConfig {
            max_retries: settings.pipeline.max_retries,
            retry_backoff: Duration::from_secs(settings.pipeline.retry_backoff_secs),
            time_budget: Duration::from_secs(settings.pipeline.time_budget_secs),
            preprocess: PreprocessOptions {
                apply_noise_reduction: settings.audio.noise_reduction,
                trim_silence: settings.audio.trim_silence,
            },
            ..TaskRunnerConfig::default()
        },
    );

    let task_id = TaskId::new();
    tracing::info!(%task_id, filename = %filename, "Task queued");

    let result = runner
        .run(
            task_id,
            UploadPayload {
                bytes,
                filename,
                candidate_id,
                job_id,
                language,
                diarization: true,
            },
        )
        .await;

    println!("{} {}", task_id, result.state);
    if let Some(error) = &result.error {
        anyhow::bail!("task failed: {}", error);
    }

    Ok(())
}
