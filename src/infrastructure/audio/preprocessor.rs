use crate::application::ports::{AudioError, AudioPreprocessor, PreprocessOptions};
use crate::application::services::wav::encode_wav_pcm16;

use super::audio_decoder::{decode_audio, TARGET_SAMPLE_RATE};

/// Peak level after volume normalization, leaving a little headroom.
const NORMALIZE_PEAK: f32 = 0.95;
/// Amplitude below this counts as silence, roughly -40 dBFS.
const SILENCE_THRESHOLD: f32 = 0.01;
const MIN_SILENCE_MS: usize = 500;
const SILENCE_PADDING_MS: usize = 200;
/// Frame size used when scanning for silence.
const FRAME_MS: usize = 10;
const HIGH_PASS_CUTOFF_HZ: f32 = 200.0;

/// Symphonia-backed preprocessing: decode, downmix, resample, peak
/// normalize, trim silence, optional high-pass, and re-encode as canonical
/// mono 16 kHz WAV.
pub struct SymphoniaPreprocessor {
    max_file_size_mb: usize,
}

impl SymphoniaPreprocessor {
    pub fn new(max_file_size_mb: usize) -> Self {
        Self { max_file_size_mb }
    }
}

impl AudioPreprocessor for SymphoniaPreprocessor {
    fn process(
        &self,
        raw_bytes: &[u8],
        filename: &str,
        options: PreprocessOptions,
    ) -> Result<Vec<u8>, AudioError> {
        if raw_bytes.is_empty() {
            return Err(AudioError::EmptyInput);
        }
        let size_mb = raw_bytes.len() / (1024 * 1024);
        if size_mb > self.max_file_size_mb {
            return Err(AudioError::PayloadTooLarge {
                size_mb,
                limit_mb: self.max_file_size_mb,
            });
        }

        let extension = file_extension(filename);
        tracing::info!(
            filename,
            bytes = raw_bytes.len(),
            extension = extension.unwrap_or("unknown"),
            "Starting audio preprocessing"
        );

        let buffer = decode_audio(raw_bytes, extension)?;
        let mut samples = buffer.samples;

        normalize_peak(&mut samples);

        if options.trim_silence {
            match nonsilent_span(&samples, TARGET_SAMPLE_RATE) {
                Some((start, end)) => {
                    let original = samples.len();
                    samples = samples[start..end].to_vec();
                    tracing::info!(
                        original_secs = original as f32 / TARGET_SAMPLE_RATE as f32,
                        trimmed_secs = samples.len() as f32 / TARGET_SAMPLE_RATE as f32,
                        "Trimmed leading/trailing silence"
                    );
                }
                None => {
                    tracing::warn!("No non-silent audio detected, keeping original");
                }
            }
        }

        if options.apply_noise_reduction {
            match high_pass(&samples, TARGET_SAMPLE_RATE, HIGH_PASS_CUTOFF_HZ) {
                Ok(filtered) => {
                    samples = filtered;
                    tracing::debug!("Applied high-pass noise reduction");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Noise reduction failed, keeping unfiltered audio");
                }
            }
        }

        let pcm: Vec<i16> = samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
            .collect();
        let wav = encode_wav_pcm16(&pcm, TARGET_SAMPLE_RATE, 1);

        tracing::info!(
            filename,
            wav_bytes = wav.len(),
            "Audio preprocessing completed"
        );
        Ok(wav)
    }
}

fn file_extension(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

fn normalize_peak(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak > f32::EPSILON {
        let gain = NORMALIZE_PEAK / peak;
        for sample in samples.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Sample range covering the first to last non-silent span, padded on both
/// sides. Silence shorter than the minimum length does not split a span.
/// Returns `None` when the whole buffer is silent.
fn nonsilent_span(samples: &[f32], sample_rate: u32) -> Option<(usize, usize)> {
    if samples.is_empty() {
        return None;
    }

    let frame_len = (sample_rate as usize * FRAME_MS) / 1000;
    let min_silence_frames = MIN_SILENCE_MS / FRAME_MS;
    let padding_samples = (sample_rate as usize * SILENCE_PADDING_MS) / 1000;

    let silent_frames: Vec<bool> = samples
        .chunks(frame_len)
        .map(|frame| frame.iter().all(|&s| s.abs() < SILENCE_THRESHOLD))
        .collect();

    // A silent run only counts as real silence when it is long enough.
    let mut first_voiced: Option<usize> = None;
    let mut last_voiced: Option<usize> = None;
    for (index, &silent) in silent_frames.iter().enumerate() {
        if !silent {
            if first_voiced.is_none() {
                first_voiced = Some(index);
            }
            last_voiced = Some(index);
        }
    }
    let (mut first, mut last) = (first_voiced?, last_voiced?);

    // Leading/trailing silence shorter than the threshold is kept, matching
    // the span-detection contract.
    if first < min_silence_frames {
        first = 0;
    }
    if silent_frames.len() - last - 1 < min_silence_frames {
        last = silent_frames.len() - 1;
    }

    let start = (first * frame_len).saturating_sub(padding_samples);
    let end = (((last + 1) * frame_len) + padding_samples).min(samples.len());
    Some((start, end))
}

/// Single-pole high-pass, suppressing low-frequency rumble.
fn high_pass(samples: &[f32], sample_rate: u32, cutoff_hz: f32) -> Result<Vec<f32>, AudioError> {
    if !cutoff_hz.is_finite() || cutoff_hz <= 0.0 || sample_rate == 0 {
        return Err(AudioError::EncodingFailed(format!(
            "invalid high-pass parameters: cutoff={} rate={}",
            cutoff_hz, sample_rate
        )));
    }

    let dt = 1.0 / sample_rate as f32;
    let rc = 1.0 / (2.0 * std::f32::consts::PI * cutoff_hz);
    let alpha = rc / (rc + dt);

    let mut output = Vec::with_capacity(samples.len());
    let mut prev_in = 0.0f32;
    let mut prev_out = 0.0f32;
    for &sample in samples {
        let filtered = alpha * (prev_out + sample - prev_in);
        output.push(filtered);
        prev_in = sample;
        prev_out = filtered;
    }

    Ok(output)
}
