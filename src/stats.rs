//! Inequality statistics over score vectors.
//!
//! The Gini coefficient here is the relative mean absolute difference
//! halved: `0.5 * mean_{i,j} |x_i - x_j| / mean(x)`, taken over the full
//! ordered i×j grid (self-pairs contribute 0). This is O(n²) in time and
//! intended for populations of a few thousand at most.

use crate::error::StatsError;

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Gini coefficient of `values`.
///
/// Input order does not matter. Fails with [`StatsError::ZeroMean`] when
/// the values cancel out to a zero mean instead of returning NaN.
pub fn gini(values: &[f64]) -> Result<f64, StatsError> {
    let mu = mean(values).ok_or(StatsError::Empty)?;
    if mu == 0.0 {
        return Err(StatsError::ZeroMean);
    }

    // Each unordered pair appears twice in the ordered grid.
    let mut abs_diff_sum = 0.0;
    for (i, &x) in values.iter().enumerate() {
        for &y in &values[i + 1..] {
            abs_diff_sum += (x - y).abs();
        }
    }
    let n = values.len() as f64;
    let mad = 2.0 * abs_diff_sum / (n * n);

    Ok(0.5 * mad / mu)
}

/// Gini coefficient of integer scores.
pub fn gini_of_scores(scores: &[i64]) -> Result<f64, StatsError> {
    let values: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
    gini(&values)
}
