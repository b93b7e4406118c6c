//! Property-based tests using proptest
//!
//! These tests verify invariants of grouping and matching that should hold
//! for any input.

use axle_eval::evaluator::{evaluate_pr, evaluate_pr_naive};
use axle_eval::grouping::group_boxes;
use axle_eval::matching::evaluate_image;
use axle_eval::metrics::calculate_iou;
use axle_eval::threshold::filter_by_confidence;
use axle_eval::types::{AnnotationDocument, BoundingBox, ImageAnnotation, Region, ScoredBox};
use proptest::prelude::*;

fn arb_box() -> impl Strategy<Value = BoundingBox> {
    (0.0f64..200.0, 0.0f64..100.0, 0.0f64..40.0, 0.0f64..40.0)
        .prop_map(|(x, y, w, h)| BoundingBox::new(x, y, x + w, y + h))
}

fn arb_scored() -> impl Strategy<Value = ScoredBox> {
    // Coarse scores produce plenty of ties.
    (arb_box(), 0u32..=10).prop_map(|(b, s)| ScoredBox::new(b, s as f64 / 10.0))
}

fn contains(outer: &BoundingBox, inner: &BoundingBox) -> bool {
    outer.xmin <= inner.xmin
        && outer.ymin <= inner.ymin
        && outer.xmax >= inner.xmax
        && outer.ymax >= inner.ymax
}

// Property: every input box ends up in exactly one output
proptest! {
    #[test]
    fn prop_grouping_is_partition(
        boxes in prop::collection::vec(arb_box(), 0..30),
        threshold in 0.0f64..5.0,
    ) {
        let groups = group_boxes(&boxes, threshold);

        // Groups are disjoint along X, so each merged box lies in one envelope.
        let mut covered = 0;
        for bbox in &boxes {
            let in_ungrouped = groups.ungrouped.iter().filter(|u| *u == bbox).count();
            let in_grouped = groups.grouped.iter().filter(|g| contains(g, bbox)).count();
            prop_assert_eq!(in_ungrouped + in_grouped, 1, "box {:?} not in exactly one output", bbox);
            if in_ungrouped == 0 {
                covered += 1;
            }
        }

        prop_assert!(groups.ungrouped.len() + 2 * groups.grouped.len() <= boxes.len());
        prop_assert_eq!(covered + groups.ungrouped.len(), boxes.len());
    }

    #[test]
    fn prop_ungrouped_are_inputs_in_xmin_order(
        boxes in prop::collection::vec(arb_box(), 0..30),
    ) {
        let groups = group_boxes(&boxes, 0.01);
        for pair in groups.ungrouped.windows(2) {
            prop_assert!(pair[0].xmin <= pair[1].xmin);
        }
        for u in &groups.ungrouped {
            prop_assert!(boxes.contains(u));
        }
    }

    #[test]
    fn prop_groups_do_not_touch(
        boxes in prop::collection::vec(arb_box(), 0..30),
    ) {
        let threshold = 0.01;
        let groups = group_boxes(&boxes, threshold);
        let mut envelopes = groups.grouped.clone();
        envelopes.sort_by(|a, b| a.xmin.total_cmp(&b.xmin));
        for pair in envelopes.windows(2) {
            prop_assert!(pair[1].xmin > pair[0].xmax + threshold);
        }
    }
}

// Property: matching saturates both sides
proptest! {
    #[test]
    fn prop_matching_saturation(
        gt in prop::collection::vec(arb_box(), 0..15),
        preds in prop::collection::vec(arb_scored(), 0..15),
        threshold in 0.0f64..=1.0,
        iou_min in 0.1f64..=1.0,
    ) {
        let counts = evaluate_image(&gt, &preds, threshold, iou_min);
        let kept = filter_by_confidence(&preds, threshold).len();

        prop_assert_eq!(counts.true_positives + counts.false_negatives, gt.len());
        prop_assert_eq!(counts.true_positives + counts.false_positives, kept);
    }

    #[test]
    fn prop_tp_non_increasing_with_threshold(
        gt in prop::collection::vec(arb_box(), 0..15),
        preds in prop::collection::vec(arb_scored(), 0..15),
    ) {
        let mut previous = usize::MAX;
        for step in 0..=10 {
            let counts = evaluate_image(&gt, &preds, step as f64 / 10.0, 0.5);
            prop_assert!(counts.true_positives <= previous);
            previous = counts.true_positives;
        }
    }

    #[test]
    fn prop_optimized_sweep_equals_naive(
        images in prop::collection::vec(
            (prop::collection::vec(arb_box(), 0..8), prop::collection::vec(arb_scored(), 0..8), 0u8..3),
            0..6,
        ),
        steps in 1usize..15,
    ) {
        let mut gt_images = Vec::new();
        let mut pred_images = Vec::new();
        for (i, (gt, preds, presence)) in images.into_iter().enumerate() {
            let location = format!("img{}.jpg", i);
            // 0: both sides, 1: ground truth only, 2: predictions only
            if presence != 2 {
                gt_images.push(ImageAnnotation::new(
                    location.clone(),
                    gt.into_iter().map(|b| Region::new_box("single_axle", b)).collect(),
                ));
            }
            if presence != 1 {
                pred_images.push(ImageAnnotation::new(
                    location,
                    preds
                        .into_iter()
                        .map(|p| Region::new_scored_box("single_axle", p.bbox, p.score))
                        .collect(),
                ));
            }
        }
        let gt_doc = AnnotationDocument::new(gt_images);
        let pred_doc = AnnotationDocument::new(pred_images);

        let fast = evaluate_pr(&gt_doc, &pred_doc, steps, 0.5).unwrap();
        let naive = evaluate_pr_naive(&gt_doc, &pred_doc, steps, 0.5).unwrap();
        prop_assert_eq!(fast, naive);
    }
}

// Property: IoU is symmetric and bounded
proptest! {
    #[test]
    fn prop_iou_symmetric_and_bounded(a in arb_box(), b in arb_box()) {
        let iou1 = calculate_iou(&a, &b);
        let iou2 = calculate_iou(&b, &a);

        prop_assert!((iou1 - iou2).abs() < 1e-10);
        prop_assert!((0.0..=1.0).contains(&iou1), "IoU should be in [0,1], got {}", iou1);
    }
}
