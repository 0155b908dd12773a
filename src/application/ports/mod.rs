mod analysis_engine;
mod audio_preprocessor;
mod status_store;

pub use analysis_engine::{AnalysisEngine, AnalysisEngineError};
pub use audio_preprocessor::{AudioError, AudioPreprocessor, PreprocessOptions};
pub use status_store::{StatusStore, StatusStoreError};
