//! Greedy matching of predictions to ground truth for a single image.

use crate::metrics::iou::calculate_iou;
use crate::threshold::{filter_by_confidence, sort_by_confidence};
use crate::types::{BoundingBox, ImageCounts, ScoredBox};

/// Outcome for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Index into the prediction slice given to [`match_detections`].
    pub prediction_index: usize,
    /// Matched ground truth index, `None` for a false positive.
    pub ground_truth_index: Option<usize>,
    /// IoU with the matched ground truth (0.0 when unmatched).
    pub iou: f64,
    pub confidence: f64,
}

impl Match {
    pub fn is_true_positive(&self) -> bool {
        self.ground_truth_index.is_some()
    }
}

/// Match score-sorted predictions to ground truth boxes.
///
/// Predictions are visited in the given order, which must already be
/// highest-confidence first. Each one takes the unmatched ground truth with
/// the strictly highest IoU among those at or above `iou_min`; on equal IoU
/// the earlier ground truth wins. A matched ground truth is locked, so a
/// later (lower-confidence) prediction can never claim it.
///
/// # Returns
///
/// One [`Match`] per prediction, in the order visited.
pub fn match_detections(
    ground_truths: &[BoundingBox],
    sorted_predictions: &[ScoredBox],
    iou_min: f64,
) -> Vec<Match> {
    let mut matched_gt = vec![false; ground_truths.len()];

    sorted_predictions
        .iter()
        .enumerate()
        .map(|(prediction_index, prediction)| {
            let mut best: Option<(usize, f64)> = None;

            for (gt_idx, gt_box) in ground_truths.iter().enumerate() {
                if matched_gt[gt_idx] {
                    continue;
                }

                let iou = calculate_iou(&prediction.bbox, gt_box);
                if iou >= iou_min && best.map_or(true, |(_, best_iou)| iou > best_iou) {
                    best = Some((gt_idx, iou));
                }
            }

            if let Some((gt_idx, _)) = best {
                matched_gt[gt_idx] = true;
            }

            Match {
                prediction_index,
                ground_truth_index: best.map(|(idx, _)| idx),
                iou: best.map_or(0.0, |(_, iou)| iou),
                confidence: prediction.score,
            }
        })
        .collect()
}

impl ImageCounts {
    /// Fold per-prediction outcomes into counts for an image with
    /// `num_ground_truths` ground truth boxes.
    pub fn from_matches(matches: &[Match], num_ground_truths: usize) -> Self {
        let true_positives = matches.iter().filter(|m| m.is_true_positive()).count();
        Self {
            true_positives,
            false_negatives: num_ground_truths - true_positives,
            false_positives: matches.len() - true_positives,
        }
    }
}

/// Count matches among predictions that are already filtered and sorted.
pub(crate) fn count_sorted(
    ground_truths: &[BoundingBox],
    sorted_predictions: &[ScoredBox],
    iou_min: f64,
) -> ImageCounts {
    if ground_truths.is_empty() || sorted_predictions.is_empty() {
        return ImageCounts::new(0, ground_truths.len(), sorted_predictions.len());
    }

    let matches = match_detections(ground_truths, sorted_predictions, iou_min);
    ImageCounts::from_matches(&matches, ground_truths.len())
}

/// Score one image's predictions against its ground truth.
///
/// Predictions below `score_threshold` are ignored; the rest are matched
/// greedily in descending score order. `TP + FN` always equals the number
/// of ground truths and `TP + FP` the number of predictions kept.
///
/// # Example
///
/// ```
/// use axle_eval::matching::evaluate_image;
/// use axle_eval::types::{BoundingBox, ScoredBox};
///
/// let gt = vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0)];
/// let predictions = vec![ScoredBox::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), 0.9)];
///
/// let counts = evaluate_image(&gt, &predictions, 0.5, 0.5);
/// assert_eq!(counts.true_positives, 1);
/// assert_eq!(counts.false_positives, 0);
/// assert_eq!(counts.false_negatives, 0);
/// ```
pub fn evaluate_image(
    ground_truths: &[BoundingBox],
    predictions: &[ScoredBox],
    score_threshold: f64,
    iou_min: f64,
) -> ImageCounts {
    let mut kept = filter_by_confidence(predictions, score_threshold);
    sort_by_confidence(&mut kept);
    count_sorted(ground_truths, &kept, iou_min)
}
