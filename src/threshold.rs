//! Confidence score thresholding utilities.

use crate::error::{AxleEvalError, Result};
use crate::types::ScoredBox;

/// Keep the predictions whose score is at least `threshold`, in input order.
///
/// # Example
///
/// ```
/// use axle_eval::threshold::filter_by_confidence;
/// use axle_eval::types::{BoundingBox, ScoredBox};
///
/// let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let predictions = vec![ScoredBox::new(bbox, 0.9), ScoredBox::new(bbox, 0.3)];
///
/// let filtered = filter_by_confidence(&predictions, 0.5);
/// assert_eq!(filtered.len(), 1);
/// ```
pub fn filter_by_confidence(predictions: &[ScoredBox], threshold: f64) -> Vec<ScoredBox> {
    predictions
        .iter()
        .filter(|p| p.score >= threshold)
        .copied()
        .collect()
}

/// Stable sort by score, highest first.
///
/// Equal scores keep their input order, so sorting then filtering gives the
/// same sequence as filtering then sorting.
pub fn sort_by_confidence(predictions: &mut [ScoredBox]) {
    predictions.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// The predictions of a score-descending slice that pass `threshold`.
///
/// `sorted` must come from [`sort_by_confidence`]; the passing predictions
/// then form a prefix.
pub fn confident_prefix(sorted: &[ScoredBox], threshold: f64) -> &[ScoredBox] {
    let end = sorted.partition_point(|p| p.score >= threshold);
    &sorted[..end]
}

/// Generate `steps + 1` evenly spaced thresholds `0, 1/steps, ..., 1`.
///
/// Each value is computed as `i / steps` rather than by accumulating a step
/// size, so `generate_thresholds(10)[3]` is exactly `0.3`.
///
/// # Errors
///
/// Returns an error if `steps` is zero.
///
/// # Example
///
/// ```
/// use axle_eval::threshold::generate_thresholds;
///
/// let thresholds = generate_thresholds(10).unwrap();
/// assert_eq!(thresholds.len(), 11);
/// assert_eq!(thresholds[0], 0.0);
/// assert_eq!(thresholds[10], 1.0);
/// ```
pub fn generate_thresholds(steps: usize) -> Result<Vec<f64>> {
    if steps == 0 {
        return Err(AxleEvalError::InvalidThreshold(
            "Number of threshold steps must be greater than 0".to_string()
        ));
    }

    Ok((0..=steps).map(|i| i as f64 / steps as f64).collect())
}

/// Validate that a threshold is in the valid range [0.0, 1.0].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(AxleEvalError::InvalidThreshold(
            format!("Threshold must be between 0.0 and 1.0, got {}", threshold)
        ));
    }
    Ok(())
}
