// Classification module
// KNN classifier, evaluation metrics, and cross-validated model selection

pub mod knn;
pub mod metrics;
pub mod selection;

pub use knn::{KnnClassifier, ModelError};
pub use metrics::{accuracy, f1_score, precision, recall};
pub use selection::{select_k, write_curve_csv, KScore, SelectionConfig, SelectionResult};
