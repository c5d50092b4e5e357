// Dataset assembly
// Scans the labeled data folders, builds the stacked sample matrix with its
// parallel label vector, and provides the seeded train/test split

use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{fix_length, ingest_wav_mono, AudioError};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load {path}: {source}")]
    Load { path: PathBuf, source: AudioError },

    #[error("No WAV files found under {0}")]
    EmptyClass(PathBuf),

    #[error("Dataset too small to split: {0} recordings")]
    TooSmall(usize),
}

/// Recording label. The numeric encoding (tram = 0, car = 1) is the label
/// vector representation used by the classifier and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Tram,
    Car,
}

impl Label {
    /// Numeric encoding used in the label vector
    pub fn to_index(self) -> u8 {
        match self {
            Label::Tram => 0,
            Label::Car => 1,
        }
    }

    /// Folder name under the data directory
    pub fn folder_name(self) -> &'static str {
        match self {
            Label::Tram => "tram",
            Label::Car => "car",
        }
    }
}

/// Stacked dataset: one fixed-length mono recording per row of `x`,
/// with the parallel label vector `y` (tram rows first, then car)
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Sample matrix, row per recording
    pub x: Vec<Vec<f32>>,

    /// Label vector, 0 = tram, 1 = car
    pub y: Vec<u8>,

    /// Number of tram recordings
    pub n_tram: usize,

    /// Number of car recordings
    pub n_car: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Indices of a train/test partition over dataset rows
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Load the labeled dataset from `data_dir`/tram and `data_dir`/car.
///
/// Every recording is downmixed to mono and forced to `target_len` samples
/// (see `audio::length`). Non-WAV directory entries are skipped. Rows are
/// ordered tram first, then car, matching the label vector.
pub fn load_dataset(
    data_dir: &Path,
    target_len: usize,
    expected_sample_rate: u32,
) -> Result<Dataset, DatasetError> {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut counts = [0usize; 2];

    for label in [Label::Tram, Label::Car] {
        let class_dir = data_dir.join(label.folder_name());
        let paths = wav_paths(&class_dir)?;

        if paths.is_empty() {
            return Err(DatasetError::EmptyClass(class_dir));
        }

        for path in paths {
            let (mono, sample_rate) =
                ingest_wav_mono(&path).map_err(|source| DatasetError::Load {
                    path: path.clone(),
                    source,
                })?;

            if sample_rate != expected_sample_rate {
                warn!(
                    "{}: sample rate {} Hz, expected {} Hz; clip length will not be 5 s",
                    path.display(),
                    sample_rate,
                    expected_sample_rate
                );
            }

            x.push(fix_length(&mono, target_len));
            y.push(label.to_index());
            counts[label.to_index() as usize] += 1;
        }

        info!(
            "loaded {} {} recordings",
            counts[label.to_index() as usize],
            label.folder_name()
        );
    }

    Ok(Dataset {
        x,
        y,
        n_tram: counts[0],
        n_car: counts[1],
    })
}

/// WAV files under `dir`, sorted by file name for reproducible row order
fn wav_paths(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    let entries = std::fs::read_dir(dir).map_err(|source| DatasetError::Scan {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("wav"))
                .unwrap_or(false)
        })
        .collect();

    paths.sort();
    Ok(paths)
}

/// Seeded shuffle split of `n` rows into train/test partitions.
/// `test_fraction` of the rows (rounded up) land in the test set.
pub fn train_test_split(
    n: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, DatasetError> {
    if n < 2 {
        return Err(DatasetError::TooSmall(n));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);

    Ok(SplitIndices {
        test: indices[..n_test].to_vec(),
        train: indices[n_test..].to_vec(),
    })
}

/// Materialize the rows selected by `indices`
pub fn gather_rows(rows: &[Vec<f32>], indices: &[usize]) -> Vec<Vec<f32>> {
    indices.iter().map(|&i| rows[i].clone()).collect()
}

/// Materialize the labels selected by `indices`
pub fn gather_labels(labels: &[u8], indices: &[usize]) -> Vec<u8> {
    indices.iter().map(|&i| labels[i]).collect()
}
