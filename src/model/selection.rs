// Model selection: pick k by cross-validated F1
// Stratified k-fold so both classes appear in every fold's test set

use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::dataset::{gather_labels, gather_rows};
use crate::model::knn::{KnnClassifier, ModelError};
use crate::model::metrics::f1_score;

/// Configuration for the k sweep
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// Largest neighbor count to try; every k in 1..=max_k is scored
    pub max_k: usize,

    /// Number of cross-validation folds (clamped to the smaller class size)
    pub folds: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig {
            max_k: 30,
            folds: 5,
        }
    }
}

/// One point on the k / F1 curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KScore {
    pub k: usize,
    pub mean_f1: f64,
}

/// Outcome of the k sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResult {
    /// k with the highest mean F1 (first such k on ties)
    pub best_k: usize,

    /// Mean F1 for every candidate k, in ascending k order
    pub curve: Vec<KScore>,
}

/// Sweep k over 1..=max_k, scoring each with stratified cross-validated F1.
///
/// The caller decides which rows to sweep over; the pipeline passes the
/// full feature set rather than only the training split, so the sweep sees
/// held-out rows and its scores run optimistic.
pub fn select_k(
    x: &[Vec<f32>],
    y: &[u8],
    config: &SelectionConfig,
) -> Result<SelectionResult, ModelError> {
    if x.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if x.len() != y.len() {
        return Err(ModelError::RowLabelMismatch {
            rows: x.len(),
            labels: y.len(),
        });
    }
    if config.max_k == 0 {
        return Err(ModelError::InvalidK);
    }

    let folds = stratified_folds(y, config.folds);

    let mut curve = Vec::with_capacity(config.max_k);
    let mut best_k = 1;
    let mut best_f1 = f64::NEG_INFINITY;

    for k in 1..=config.max_k {
        let mut fold_scores = Vec::with_capacity(folds.len());

        for test_idx in &folds {
            let train_idx: Vec<usize> =
                (0..x.len()).filter(|i| !test_idx.contains(i)).collect();

            let model = KnnClassifier::fit(
                k,
                gather_rows(x, &train_idx),
                gather_labels(y, &train_idx),
            )?;

            let y_pred = model.predict(&gather_rows(x, test_idx));
            let y_test = gather_labels(y, test_idx);
            fold_scores.push(f1_score(&y_test, &y_pred));
        }

        let mean_f1 = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
        debug!("k={} mean F1 {:.4}", k, mean_f1);

        if mean_f1 > best_f1 {
            best_f1 = mean_f1;
            best_k = k;
        }
        curve.push(KScore { k, mean_f1 });
    }

    Ok(SelectionResult { best_k, curve })
}

/// Partition row indices into stratified folds: each class's rows are
/// chunked in order and chunk i goes to fold i. The fold count is clamped
/// to the smaller class size so no fold loses a class entirely.
fn stratified_folds(y: &[u8], requested_folds: usize) -> Vec<Vec<usize>> {
    let min_class_count = (0u8..=1)
        .map(|label| y.iter().filter(|&&l| l == label).count())
        .filter(|&count| count > 0)
        .min()
        .unwrap_or(0);

    let folds = requested_folds.clamp(2, min_class_count.max(2));
    if folds != requested_folds {
        warn!(
            "adjusting cross-validation folds from {} to {} (minimum 2, smaller class has {} recordings)",
            requested_folds, folds, min_class_count
        );
    }

    let mut fold_indices: Vec<Vec<usize>> = vec![Vec::new(); folds];

    for label in 0u8..=1 {
        let class_rows: Vec<usize> = y
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == label)
            .map(|(i, _)| i)
            .collect();

        // Near-equal contiguous chunks, earlier folds take the remainder
        let base = class_rows.len() / folds;
        let extra = class_rows.len() % folds;
        let mut cursor = 0;

        for (fold, indices) in fold_indices.iter_mut().enumerate() {
            let size = base + usize::from(fold < extra);
            indices.extend_from_slice(&class_rows[cursor..cursor + size]);
            cursor += size;
        }
    }

    fold_indices.retain(|fold| !fold.is_empty());
    fold_indices
}

/// Write the k / F1 curve as CSV, the textual stand-in for the score plot
pub fn write_curve_csv(path: &Path, curve: &[KScore]) -> std::io::Result<()> {
    let mut out = String::from("k,mean_f1\n");
    for point in curve {
        out.push_str(&format!("{},{:.6}\n", point.k, point.mean_f1));
    }
    std::fs::write(path, out)
}
