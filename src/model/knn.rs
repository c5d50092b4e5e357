// k-nearest-neighbors classifier
// Euclidean distance over feature rows, majority vote among the k nearest

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Row/label count mismatch: {rows} rows, {labels} labels")]
    RowLabelMismatch { rows: usize, labels: usize },

    #[error("k must be at least 1")]
    InvalidK,
}

/// Fitted KNN model. "Fitting" stores the training rows; all work happens
/// at prediction time.
pub struct KnnClassifier {
    k: usize,
    train_x: Vec<Vec<f32>>,
    train_y: Vec<u8>,
}

impl KnnClassifier {
    /// Store the training data for a k-neighbor model
    pub fn fit(k: usize, train_x: Vec<Vec<f32>>, train_y: Vec<u8>) -> Result<Self, ModelError> {
        if k == 0 {
            return Err(ModelError::InvalidK);
        }
        if train_x.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if train_x.len() != train_y.len() {
            return Err(ModelError::RowLabelMismatch {
                rows: train_x.len(),
                labels: train_y.len(),
            });
        }

        Ok(KnnClassifier {
            k,
            train_x,
            train_y,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Predict the label of a single feature row
    pub fn predict_one(&self, row: &[f32]) -> u8 {
        let mut neighbors: Vec<(f32, u8)> = self
            .train_x
            .iter()
            .zip(self.train_y.iter())
            .map(|(train_row, &label)| (euclidean_distance(row, train_row), label))
            .collect();

        neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let k = self.k.min(neighbors.len());

        // Vote counts and summed distances per label; the distance sum
        // breaks ties toward the closer class
        let mut votes = [0usize; 2];
        let mut dist_sums = [0.0f32; 2];
        for &(dist, label) in neighbors.iter().take(k) {
            votes[label as usize] += 1;
            dist_sums[label as usize] += dist;
        }

        match votes[1].cmp(&votes[0]) {
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Less => 0,
            std::cmp::Ordering::Equal => {
                if dist_sums[1] < dist_sums[0] {
                    1
                } else {
                    0
                }
            }
        }
    }

    /// Predict labels for a batch of feature rows
    pub fn predict(&self, rows: &[Vec<f32>]) -> Vec<u8> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
