//! Corpus-level evaluation: per-image reports and precision-recall sweeps.

use std::collections::{HashMap, HashSet};

use crate::config::EvaluationConfig;
use crate::error::Result;
use crate::matching::{count_sorted, evaluate_image};
use crate::metrics::precision_recall::PrecisionRecall;
use crate::threshold::{confident_prefix, generate_thresholds, sort_by_confidence};
use crate::types::{AnnotationDocument, BoundingBox, ImageCounts, PrecisionRecallPoint, ScoredBox};

/// Evaluation result for one image location.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEvaluation {
    pub location: String,
    pub counts: ImageCounts,
    /// Whether the location appears in the ground truth document.
    pub has_ground_truth: bool,
    /// Whether the location appears in the prediction document.
    pub has_predictions: bool,
}

/// Ground truth and predictions of one location, paired across documents.
struct ImagePair {
    location: String,
    ground_truth: Option<Vec<BoundingBox>>,
    predictions: Option<Vec<ScoredBox>>,
}

impl ImagePair {
    fn ground_truth(&self) -> &[BoundingBox] {
        self.ground_truth.as_deref().unwrap_or_default()
    }

    fn predictions(&self) -> &[ScoredBox] {
        self.predictions.as_deref().unwrap_or_default()
    }
}

/// Pair images of both documents by location.
///
/// Ground truth images come first in document order, followed by
/// locations that only have predictions.
fn pair_images(
    ground_truth: &AnnotationDocument,
    predictions: &AnnotationDocument,
) -> Result<Vec<ImagePair>> {
    let gt_images = ground_truth.images()?;
    let pred_images = predictions.images()?;

    let mut predictions_by_location: HashMap<&str, Vec<ScoredBox>> = HashMap::new();
    let mut prediction_order: Vec<&str> = Vec::new();
    for image in pred_images {
        let boxes = image.predicted_boxes()?;
        if predictions_by_location.insert(&image.location, boxes).is_some() {
            log::warn!("duplicate prediction image '{}', keeping the last one", image.location);
        } else {
            prediction_order.push(&image.location);
        }
    }

    let mut pairs = Vec::with_capacity(gt_images.len());
    let mut seen: HashSet<&str> = HashSet::new();
    for image in gt_images {
        let predictions = predictions_by_location.get(image.location.as_str()).cloned();
        if predictions.is_none() {
            log::debug!("no predictions for '{}'", image.location);
        }
        seen.insert(&image.location);
        pairs.push(ImagePair {
            location: image.location.clone(),
            ground_truth: Some(image.ground_truth_boxes()?),
            predictions,
        });
    }

    for location in prediction_order {
        if seen.contains(location) {
            continue;
        }
        log::debug!("predictions for '{}' have no ground truth", location);
        pairs.push(ImagePair {
            location: location.to_string(),
            ground_truth: None,
            predictions: predictions_by_location.remove(location),
        });
    }

    Ok(pairs)
}

fn to_point(threshold: f64, counts: ImageCounts) -> PrecisionRecallPoint {
    let pr = PrecisionRecall::from(counts);
    PrecisionRecallPoint {
        threshold,
        precision: pr.precision,
        recall: pr.recall,
    }
}

/// Evaluate every image at a single confidence threshold.
///
/// Locations present on only one side are reported too: all their ground
/// truths as false negatives, or all their kept predictions as false
/// positives.
pub fn evaluate_images(
    ground_truth: &AnnotationDocument,
    predictions: &AnnotationDocument,
    score_threshold: f64,
    iou_min: f64,
) -> Result<Vec<ImageEvaluation>> {
    let pairs = pair_images(ground_truth, predictions)?;

    Ok(pairs
        .iter()
        .map(|pair| ImageEvaluation {
            location: pair.location.clone(),
            counts: evaluate_image(pair.ground_truth(), pair.predictions(), score_threshold, iou_min),
            has_ground_truth: pair.ground_truth.is_some(),
            has_predictions: pair.predictions.is_some(),
        })
        .collect())
}

/// Sweep `num_thresholds + 1` confidence thresholds `0, 1/N, ..., 1` and
/// report corpus-wide precision and recall at each.
///
/// Predictions are sorted once per image and each threshold keeps a prefix
/// of that order, which yields exactly the counts of
/// [`evaluate_pr_naive`].
///
/// # Returns
///
/// One point per threshold, in ascending threshold order.
///
/// # Errors
///
/// Returns an error if either document lacks an image list, a prediction
/// region has no score, or `num_thresholds` is zero.
///
/// # Example
///
/// ```
/// use axle_eval::evaluator::evaluate_pr;
/// use axle_eval::types::{AnnotationDocument, BoundingBox, ImageAnnotation, Region};
///
/// let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let gt = AnnotationDocument::new(vec![ImageAnnotation::new(
///     "a.jpg",
///     vec![Region::new_box("single_axle", bbox)],
/// )]);
/// let pred = AnnotationDocument::new(vec![ImageAnnotation::new(
///     "a.jpg",
///     vec![Region::new_scored_box("single_axle", bbox, 0.75)],
/// )]);
///
/// let curve = evaluate_pr(&gt, &pred, 4, 0.5).unwrap();
/// assert_eq!(curve.len(), 5);
/// assert_eq!(curve[3].precision, 1.0); // threshold 0.75
/// assert_eq!(curve[4].recall, 0.0); // threshold 1.0
/// ```
pub fn evaluate_pr(
    ground_truth: &AnnotationDocument,
    predictions: &AnnotationDocument,
    num_thresholds: usize,
    iou_min: f64,
) -> Result<Vec<PrecisionRecallPoint>> {
    let thresholds = generate_thresholds(num_thresholds)?;
    let mut pairs = pair_images(ground_truth, predictions)?;

    for pair in &mut pairs {
        if let Some(boxes) = pair.predictions.as_mut() {
            sort_by_confidence(boxes);
        }
    }

    let points = thresholds
        .iter()
        .map(|&threshold| {
            let mut total = ImageCounts::default();
            for pair in &pairs {
                let kept = confident_prefix(pair.predictions(), threshold);
                total += count_sorted(pair.ground_truth(), kept, iou_min);
            }
            log::debug!(
                "threshold {:.3}: tp={} fp={} fn={}",
                threshold,
                total.true_positives,
                total.false_positives,
                total.false_negatives
            );
            to_point(threshold, total)
        })
        .collect();

    Ok(points)
}

/// Reference sweep that re-filters and re-sorts every image at every
/// threshold through [`evaluate_image`].
pub fn evaluate_pr_naive(
    ground_truth: &AnnotationDocument,
    predictions: &AnnotationDocument,
    num_thresholds: usize,
    iou_min: f64,
) -> Result<Vec<PrecisionRecallPoint>> {
    let thresholds = generate_thresholds(num_thresholds)?;
    let pairs = pair_images(ground_truth, predictions)?;

    Ok(thresholds
        .iter()
        .map(|&threshold| {
            let total = pairs.iter().fold(ImageCounts::default(), |acc, pair| {
                acc + evaluate_image(pair.ground_truth(), pair.predictions(), threshold, iou_min)
            });
            to_point(threshold, total)
        })
        .collect())
}

/// Run [`evaluate_pr`] with the sweep settings of an [`EvaluationConfig`].
pub fn evaluate_with_config(
    ground_truth: &AnnotationDocument,
    predictions: &AnnotationDocument,
    config: &EvaluationConfig,
) -> Result<Vec<PrecisionRecallPoint>> {
    config.validate()?;
    evaluate_pr(ground_truth, predictions, config.num_thresholds, config.iou_min)
}
