// Audio processing module
// WAV ingestion, clip length normalization, and noise reduction

pub mod denoise;
pub mod ingest;
pub mod length;

pub use denoise::{reduce_noise, reduce_noise_batch, DenoiseConfig};
pub use ingest::{ingest_wav, ingest_wav_mono, AudioData, AudioError};
pub use length::fix_length;
