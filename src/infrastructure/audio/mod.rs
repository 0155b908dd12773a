pub mod audio_decoder;
mod preprocessor;

pub use audio_decoder::{decode_audio, AudioBuffer, TARGET_SAMPLE_RATE};
pub use preprocessor::SymphoniaPreprocessor;
