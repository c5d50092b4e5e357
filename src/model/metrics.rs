// Binary classification metrics
// Positive class is car (label 1); tram (label 0) is the negative class

/// Fraction of predictions matching the truth
pub fn accuracy(y_true: &[u8], y_pred: &[u8]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / y_true.len() as f64
}

/// tp / (tp + fp); 0.0 when nothing was predicted positive
pub fn precision(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let (tp, fp, _) = count_outcomes(y_true, y_pred);
    if tp + fp == 0 {
        return 0.0;
    }
    tp as f64 / (tp + fp) as f64
}

/// tp / (tp + fn); 0.0 when no positives exist in the truth
pub fn recall(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let (tp, _, fn_) = count_outcomes(y_true, y_pred);
    if tp + fn_ == 0 {
        return 0.0;
    }
    tp as f64 / (tp + fn_) as f64
}

/// Harmonic mean of precision and recall
pub fn f1_score(y_true: &[u8], y_pred: &[u8]) -> f64 {
    let p = precision(y_true, y_pred);
    let r = recall(y_true, y_pred);
    if p + r == 0.0 {
        return 0.0;
    }
    2.0 * p * r / (p + r)
}

/// (true positives, false positives, false negatives)
fn count_outcomes(y_true: &[u8], y_pred: &[u8]) -> (usize, usize, usize) {
    let mut tp = 0;
    let mut fp = 0;
    let mut fn_ = 0;

    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        match (t, p) {
            (1, 1) => tp += 1,
            (0, 1) => fp += 1,
            (1, 0) => fn_ += 1,
            _ => {}
        }
    }

    (tp, fp, fn_)
}
