use crate::application::ports::AudioError;

/// Standard PCM WAV header length produced by the preprocessor.
pub const WAV_HEADER_LEN: usize = 44;

/// Format parameters parsed from a WAV header. Window durations are derived
/// from these, never from assumed constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl WavSpec {
    pub fn bytes_per_second(&self) -> usize {
        self.sample_rate as usize * self.channels as usize * (self.bits_per_sample as usize / 8)
    }

    /// Audio duration of a payload slice, in seconds.
    pub fn duration_of(&self, payload_len: usize) -> f64 {
        let rate = self.bytes_per_second();
        if rate == 0 {
            return 0.0;
        }
        payload_len as f64 / rate as f64
    }
}

/// Parse the fixed 44-byte canonical header written by the preprocessor.
pub fn parse_wav_header(data: &[u8]) -> Result<WavSpec, AudioError> {
    if data.len() < WAV_HEADER_LEN {
        return Err(AudioError::DecodingFailed(format!(
            "WAV data too short for header: {} bytes",
            data.len()
        )));
    }
    if &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return Err(AudioError::DecodingFailed(
            "missing RIFF/WAVE magic".to_string(),
        ));
    }

    let channels = u16::from_le_bytes([data[22], data[23]]);
    let sample_rate = u32::from_le_bytes([data[24], data[25], data[26], data[27]]);
    let bits_per_sample = u16::from_le_bytes([data[34], data[35]]);

    if channels == 0 || sample_rate == 0 || bits_per_sample == 0 {
        return Err(AudioError::DecodingFailed(format!(
            "invalid WAV format fields: rate={} channels={} bits={}",
            sample_rate, channels, bits_per_sample
        )));
    }

    Ok(WavSpec {
        sample_rate,
        channels,
        bits_per_sample,
    })
}

/// Encode 16-bit PCM samples as a self-describing WAV file.
pub fn encode_wav_pcm16(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let data_size = (samples.len() * 2) as u32;
    let byte_rate = sample_rate * channels as u32 * 2;
    let block_align = channels * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(WAV_HEADER_LEN + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }
    wav
}

/// One independently decodable slice of a large recording.
#[derive(Debug, Clone)]
pub struct AudioWindow {
    pub bytes: Vec<u8>,
    pub duration: f64,
}

/// Split a WAV file into fixed-size payload windows, reattaching a rebuilt
/// header to each so every window decodes standalone. Windows are returned
/// in positional order; each carries its own duration computed from the
/// parsed format.
pub fn split_into_windows(
    wav_bytes: &[u8],
    window_payload_bytes: usize,
) -> Result<Vec<AudioWindow>, AudioError> {
    let spec = parse_wav_header(wav_bytes)?;
    let payload = &wav_bytes[WAV_HEADER_LEN..];

    if payload.is_empty() {
        return Err(AudioError::DecodingFailed("WAV has no payload".to_string()));
    }

    let mut windows = Vec::with_capacity(payload.len() / window_payload_bytes + 1);
    for slice in payload.chunks(window_payload_bytes) {
        let data_size = slice.len() as u32;
        let byte_rate = spec.sample_rate * spec.channels as u32 * (spec.bits_per_sample as u32 / 8);
        let block_align = spec.channels * (spec.bits_per_sample / 8);
        let file_size = 36 + data_size;

        let mut bytes = Vec::with_capacity(WAV_HEADER_LEN + slice.len());
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&file_size.to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&spec.channels.to_le_bytes());
        bytes.extend_from_slice(&spec.sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&spec.bits_per_sample.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_size.to_le_bytes());
        bytes.extend_from_slice(slice);

        windows.push(AudioWindow {
            bytes,
            duration: spec.duration_of(slice.len()),
        });
    }

    Ok(windows)
}
