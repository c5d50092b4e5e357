// Audio ingestion module
// Reads WAV files and normalizes samples to mono f32

use std::path::Path;

use hound::{SampleFormat, WavReader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to read WAV file: {0}")]
    WavReadError(#[from] hound::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Empty audio file")]
    EmptyFile,
}

#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples normalized to f32 in range [-1.0, 1.0], interleaved
    pub samples: Vec<f32>,

    /// Sample rate in Hz (e.g., 44100, 48000)
    pub sample_rate: u32,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Total number of frames (samples / channels)
    pub frame_count: usize,
}

impl AudioData {
    /// Convert to mono by averaging channels
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels == 1 {
            return self.samples.clone();
        }

        let mut mono = Vec::with_capacity(self.frame_count);
        let channels = self.channels as usize;

        for frame_idx in 0..self.frame_count {
            let mut sum = 0.0;
            for ch in 0..channels {
                sum += self.samples[frame_idx * channels + ch];
            }
            mono.push(sum / channels as f32);
        }

        mono
    }
}

/// Ingest a WAV file from disk
/// Returns AudioData with normalized samples and metadata
pub fn ingest_wav(path: &Path) -> Result<AudioData, AudioError> {
    let mut reader = WavReader::open(path)?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels;
    let bit_depth = spec.bits_per_sample;
    let sample_format = spec.sample_format;

    // Read and normalize samples to f32 [-1.0, 1.0]
    let samples: Vec<f32> = match (sample_format, bit_depth) {
        (SampleFormat::Int, 8) => {
            // 8-bit PCM: unsigned, range [0, 255] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| (s as f32 - 128.0) / 128.0)
                .collect()
        }
        (SampleFormat::Int, 16) => {
            // 16-bit PCM: signed, range [-32768, 32767] -> [-1.0, 1.0]
            reader
                .samples::<i16>()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 32768.0)
                .collect()
        }
        (SampleFormat::Int, 24) => {
            // 24-bit PCM: signed, range [-8388608, 8388607] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 8388608.0)
                .collect()
        }
        (SampleFormat::Int, 32) => {
            // 32-bit PCM: signed, range [-2147483648, 2147483647] -> [-1.0, 1.0]
            reader
                .samples::<i32>()
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(|s| s as f32 / 2147483648.0)
                .collect()
        }
        (SampleFormat::Float, 32) => {
            // 32-bit float: already in [-1.0, 1.0] (typically)
            reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?
        }
        _ => {
            return Err(AudioError::UnsupportedFormat(format!(
                "{:?} {}-bit audio",
                sample_format, bit_depth
            )));
        }
    };

    if samples.is_empty() {
        return Err(AudioError::EmptyFile);
    }

    let frame_count = samples.len() / channels as usize;

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
        frame_count,
    })
}

/// Ingest a WAV file and downmix to a mono sample vector
pub fn ingest_wav_mono(path: &Path) -> Result<(Vec<f32>, u32), AudioError> {
    let audio = ingest_wav(path)?;
    let sample_rate = audio.sample_rate;
    Ok((audio.to_mono(), sample_rate))
}
