// Per-row z-score normalization of the feature matrix

/// Standardize each row in place: subtract the row mean, divide by the row
/// standard deviation. A near-constant row is left centered but unscaled to
/// avoid dividing by zero.
pub fn zscore_rows(rows: &mut [Vec<f32>]) {
    for row in rows.iter_mut() {
        zscore_row(row);
    }
}

fn zscore_row(row: &mut [f32]) {
    if row.is_empty() {
        return;
    }

    let n = row.len() as f32;
    let mean = row.iter().sum::<f32>() / n;
    let var = row.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
    let std = var.sqrt();

    if std > 1e-12 {
        for v in row.iter_mut() {
            *v = (*v - mean) / std;
        }
    } else {
        for v in row.iter_mut() {
            *v -= mean;
        }
    }
}
