// Feature extraction module
// One feature row per recording: the flattened, z-scored magnitude
// spectrogram (frames concatenated in time order)

pub mod normalize;
pub mod stft;

pub use normalize::zscore_rows;
pub use stft::{stft_magnitude, StftConfig};

use log::info;

/// Build the feature matrix for a stack of equal-length recordings.
///
/// Each recording's Hamming-windowed magnitude spectrogram is flattened into
/// one row, then every row is independently z-score normalized. All rows
/// have the same width because every recording has the same fixed length.
pub fn extract_feature_matrix(x: &[Vec<f32>], config: &StftConfig) -> Vec<Vec<f32>> {
    let mut features: Vec<Vec<f32>> = x
        .iter()
        .map(|samples| {
            let frames = stft_magnitude(samples, config);
            let mut row = Vec::with_capacity(frames.len() * config.num_bins());
            for frame in frames {
                row.extend(frame);
            }
            row
        })
        .collect();

    zscore_rows(&mut features);

    if let Some(first) = features.first() {
        info!(
            "feature matrix: {} rows x {} columns",
            features.len(),
            first.len()
        );
    }

    features
}
