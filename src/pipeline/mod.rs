// Pipeline orchestration
// Runs the full analysis once: load and length-fix the labeled recordings,
// denoise, extract STFT features, select k by cross-validation, then train
// and evaluate on a held-out split

use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{reduce_noise_batch, DenoiseConfig};
use crate::dataset::{
    gather_labels, gather_rows, load_dataset, train_test_split, DatasetError,
};
use crate::features::{extract_feature_matrix, StftConfig};
use crate::model::{
    accuracy, f1_score, precision, recall, select_k, write_curve_csv, KScore, KnnClassifier,
    ModelError, SelectionConfig,
};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// End-to-end pipeline configuration. Defaults: 5 s clips at 48 kHz,
/// 80/20 split with seed 16, k swept to 30 over 5 folds.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root folder holding `tram/` and `car/` WAV subfolders
    pub data_dir: PathBuf,

    /// Expected sample rate of the recordings
    pub sample_rate: u32,

    /// Normalized clip duration in seconds
    pub clip_seconds: f64,

    /// Fraction of rows held out for evaluation
    pub test_fraction: f64,

    /// Seed for the train/test shuffle
    pub split_seed: u64,

    pub denoise: DenoiseConfig,
    pub selection: SelectionConfig,

    /// Where to write the k / F1 curve CSV; None suppresses it
    pub curve_path: Option<PathBuf>,

    /// Where to write the JSON evaluation report; None suppresses it
    pub report_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            data_dir: PathBuf::from("data"),
            sample_rate: 48_000,
            clip_seconds: 5.0,
            test_fraction: 0.2,
            split_seed: 16,
            denoise: DenoiseConfig::default(),
            selection: SelectionConfig::default(),
            curve_path: None,
            report_path: None,
        }
    }
}

impl PipelineConfig {
    /// Normalized clip length in samples (5 s x 48 kHz = 240,000 by default)
    pub fn target_len(&self) -> usize {
        (self.sample_rate as f64 * self.clip_seconds) as usize
    }
}

/// Everything the evaluation produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Neighbor count chosen by cross-validation
    pub best_k: usize,

    pub n_train: usize,
    pub n_test: usize,

    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,

    /// First held-out row's prediction vs ground truth (0 = tram, 1 = car)
    pub sample_predicted: u8,
    pub sample_truth: u8,

    /// Mean F1 per candidate k from the selection sweep
    pub curve: Vec<KScore>,
}

impl EvaluationReport {
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }

    pub fn from_json_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// Run the whole pipeline once
pub fn run(config: &PipelineConfig) -> Result<EvaluationReport, PipelineError> {
    // 1. Load and length-normalize the labeled recordings
    let dataset = load_dataset(&config.data_dir, config.target_len(), config.sample_rate)?;
    info!(
        "dataset: {} recordings ({} tram, {} car), {} samples each",
        dataset.len(),
        dataset.n_tram,
        dataset.n_car,
        config.target_len()
    );
    debug_assert_eq!(dataset.x.len(), dataset.y.len());

    // 2. Denoise the stacked matrix
    let mut x = dataset.x;
    reduce_noise_batch(&mut x, config.sample_rate, &config.denoise);

    // 3. STFT feature rows, z-scored
    let stft = StftConfig::for_sample_rate(config.sample_rate);
    let features = extract_feature_matrix(&x, &stft);

    // 4. Pick k by cross-validated F1 over the full feature set.
    // The sweep deliberately sees every row, held-out ones included;
    // its mean F1 is optimistic.
    warn!("k selection cross-validates on the full dataset, before the train/test split");
    let selection = select_k(&features, &dataset.y, &config.selection)?;
    info!("selected k = {}", selection.best_k);

    if let Some(path) = &config.curve_path {
        write_curve_csv(path, &selection.curve).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;
        info!("wrote score curve to {}", path.display());
    }

    // 5. Train on the 80% split, evaluate on the held-out 20%
    let split = train_test_split(features.len(), config.test_fraction, config.split_seed)?;

    let model = KnnClassifier::fit(
        selection.best_k,
        gather_rows(&features, &split.train),
        gather_labels(&dataset.y, &split.train),
    )?;

    let y_test = gather_labels(&dataset.y, &split.test);
    let y_pred = model.predict(&gather_rows(&features, &split.test));

    let report = EvaluationReport {
        best_k: selection.best_k,
        n_train: split.train.len(),
        n_test: split.test.len(),
        accuracy: accuracy(&y_test, &y_pred),
        precision: precision(&y_test, &y_pred),
        recall: recall(&y_test, &y_pred),
        f1: f1_score(&y_test, &y_pred),
        sample_predicted: y_pred[0],
        sample_truth: y_test[0],
        curve: selection.curve,
    };

    if let Some(path) = &config.report_path {
        let bytes = report.to_json_bytes()?;
        std::fs::write(path, bytes).map_err(|source| PipelineError::Write {
            path: path.clone(),
            source,
        })?;
        info!("wrote evaluation report to {}", path.display());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::path::Path;

    fn write_sine_wav(path: &Path, freq: f32, sample_rate: u32, seconds: f32) {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        let n = (sample_rate as f32 * seconds) as usize;
        for i in 0..n {
            let value =
                (std::f32::consts::TAU * freq * i as f32 / sample_rate as f32).sin() * 0.6;
            writer
                .write_sample((value * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }

    /// 3 four-second tram tones and 3 six-second car tones at distinct
    /// frequencies; every clip gets padded or trimmed to 5 s
    fn synthetic_data_dir(dir: &Path, sample_rate: u32) {
        let tram_dir = dir.join("tram");
        let car_dir = dir.join("car");
        std::fs::create_dir_all(&tram_dir).unwrap();
        std::fs::create_dir_all(&car_dir).unwrap();

        for (i, freq) in [300.0, 320.0, 340.0].iter().enumerate() {
            write_sine_wav(&tram_dir.join(format!("tram_{i}.wav")), *freq, sample_rate, 4.0);
        }
        for (i, freq) in [1400.0, 1500.0, 1600.0].iter().enumerate() {
            write_sine_wav(&car_dir.join(format!("car_{i}.wav")), *freq, sample_rate, 6.0);
        }
    }

    #[test]
    fn test_end_to_end_synthetic_dataset() {
        let dir = tempfile::tempdir().unwrap();
        synthetic_data_dir(dir.path(), 48_000);

        let curve_path = dir.path().join("scores.csv");
        let report_path = dir.path().join("report.json");

        let config = PipelineConfig {
            data_dir: dir.path().to_path_buf(),
            curve_path: Some(curve_path.clone()),
            report_path: Some(report_path.clone()),
            ..PipelineConfig::default()
        };

        let report = run(&config).unwrap();

        for value in [report.accuracy, report.precision, report.recall, report.f1] {
            assert!((0.0..=1.0).contains(&value));
        }
        assert!(report.sample_predicted <= 1);
        assert!(report.sample_truth <= 1);
        assert_eq!(report.n_train + report.n_test, 6);
        assert!(report.best_k >= 1 && report.best_k <= 30);
        assert_eq!(report.curve.len(), 30);

        // Optional artifacts were requested, so both must exist
        assert!(curve_path.exists());
        assert!(report_path.exists());

        let bytes = std::fs::read(&report_path).unwrap();
        let parsed = EvaluationReport::from_json_bytes(&bytes).unwrap();
        assert_eq!(parsed.best_k, report.best_k);
    }

    #[test]
    fn test_missing_data_dir_is_an_error() {
        let config = PipelineConfig {
            data_dir: PathBuf::from("no/such/dir"),
            ..PipelineConfig::default()
        };

        assert!(matches!(run(&config), Err(PipelineError::Dataset(_))));
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = EvaluationReport {
            best_k: 7,
            n_train: 45,
            n_test: 12,
            accuracy: 0.9167,
            precision: 0.8571,
            recall: 1.0,
            f1: 0.9231,
            sample_predicted: 1,
            sample_truth: 1,
            curve: vec![KScore { k: 1, mean_f1: 0.8 }],
        };

        let bytes = report.to_json_bytes().unwrap();
        let parsed = EvaluationReport::from_json_bytes(&bytes).unwrap();

        assert_eq!(parsed.best_k, 7);
        assert_eq!(parsed.n_test, 12);
        assert_eq!(parsed.curve.len(), 1);
    }
}
