/// Options for the preprocessing pass.
#[derive(Debug, Clone, Copy)]
pub struct PreprocessOptions {
    pub apply_noise_reduction: bool,
    pub trim_silence: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            apply_noise_reduction: true,
            trim_silence: true,
        }
    }
}

/// Normalizes raw uploaded audio to canonical mono 16 kHz PCM WAV. Pure
/// transform of bytes in, bytes out; CPU-bound, so the contract is
/// synchronous.
pub trait AudioPreprocessor: Send + Sync {
    fn process(
        &self,
        raw_bytes: &[u8],
        filename: &str,
        options: PreprocessOptions,
    ) -> Result<Vec<u8>, AudioError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("empty audio payload")]
    EmptyInput,
    #[error("audio payload exceeds limit: {size_mb} MB > {limit_mb} MB")]
    PayloadTooLarge { size_mb: usize, limit_mb: usize },
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("audio encoding failed: {0}")]
    EncodingFailed(String),
}
