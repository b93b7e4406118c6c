//! Merging of contiguous single-axle boxes into grouped-axle boxes.
//!
//! Grouping looks at the X axis only: boxes are swept left to right and a
//! box joins the current group when its `xmin` lies within
//! `overlap_threshold` of the group's running `xmax`. Because the running
//! `xmax` grows as boxes join, chains are absorbed transitively.

use std::collections::HashMap;

use crate::config::GroupingConfig;
use crate::error::Result;
use crate::stats::GroupingStats;
use crate::types::{
    AnnotationDocument, AxleGroups, BoundingBox, Region, GROUPED_AXLES_TAG, SINGLE_AXLE_TAG,
};

/// Group the single-axle boxes of one image.
///
/// Every input box ends up in exactly one place: inside one envelope of
/// `grouped`, or unchanged in `ungrouped` (listed in `xmin` order).
///
/// # Example
///
/// ```
/// use axle_eval::grouping::group_boxes;
/// use axle_eval::types::BoundingBox;
///
/// let boxes = vec![
///     BoundingBox::new(0.0, 0.0, 10.0, 5.0),
///     BoundingBox::new(10.005, 1.0, 20.0, 6.0),
/// ];
/// let groups = group_boxes(&boxes, 0.01);
/// assert_eq!(groups.grouped, vec![BoundingBox::new(0.0, 0.0, 20.0, 6.0)]);
/// assert!(groups.ungrouped.is_empty());
/// ```
pub fn group_boxes(boxes: &[BoundingBox], overlap_threshold: f64) -> AxleGroups {
    // Stable: equal xmin keeps input order.
    let mut sorted = boxes.to_vec();
    sorted.sort_by(|a, b| a.xmin.total_cmp(&b.xmin));

    let mut consumed = vec![false; sorted.len()];
    let mut grouped = Vec::new();

    for seed in 0..sorted.len() {
        if consumed[seed] {
            continue;
        }

        let mut members = vec![seed];
        let mut current_xmax = sorted[seed].xmax;

        for candidate in (seed + 1)..sorted.len() {
            if consumed[candidate] {
                continue;
            }
            let bbox = &sorted[candidate];
            if bbox.xmin <= current_xmax + overlap_threshold {
                members.push(candidate);
                current_xmax = current_xmax.max(bbox.xmax);
            }
        }

        // A lone seed stays available; only real groups consume their members.
        if members.len() > 1 {
            let member_boxes: Vec<BoundingBox> = members.iter().map(|&i| sorted[i]).collect();
            if let Some(envelope) = BoundingBox::envelope(&member_boxes) {
                grouped.push(envelope);
            }
            for &i in &members {
                consumed[i] = true;
            }
        }
    }

    let ungrouped = sorted
        .into_iter()
        .zip(consumed)
        .filter(|(_, used)| !used)
        .map(|(bbox, _)| bbox)
        .collect();

    AxleGroups { grouped, ungrouped }
}

/// Group the single-axle boxes of every image independently.
pub fn group_axles(
    boxes_by_image: &HashMap<String, Vec<BoundingBox>>,
    overlap_threshold: f64,
) -> HashMap<String, AxleGroups> {
    boxes_by_image
        .iter()
        .map(|(location, boxes)| {
            let groups = group_boxes(boxes, overlap_threshold);
            log::debug!(
                "{}: {} single axle(s) -> {} group(s), {} ungrouped",
                location,
                boxes.len(),
                groups.grouped.len(),
                groups.ungrouped.len()
            );
            (location.clone(), groups)
        })
        .collect()
}

/// Collect the boxes of every region tagged `single_axle`, per image location.
///
/// # Errors
///
/// Returns `MissingField("images")` if the document has no image list, or
/// `InvalidRegion` if a single axle's `region` lacks a numeric corner.
pub fn extract_single_axle_boxes(
    document: &AnnotationDocument,
) -> Result<HashMap<String, Vec<BoundingBox>>> {
    let images = document.images()?;
    let mut boxes_by_image = HashMap::with_capacity(images.len());

    for image in images {
        let boxes = image
            .annotated_regions
            .iter()
            .filter(|r| r.is_single_axle())
            .map(|r| r.bbox().map_err(|e| image.in_image(e)))
            .collect::<Result<Vec<_>>>()?;
        boxes_by_image.insert(image.location.clone(), boxes);
    }

    Ok(boxes_by_image)
}

/// Rewrite the axle regions of every image from a grouping result.
///
/// Per image the new region list is: the non-axle regions in their original
/// order and untouched, then any pre-existing `grouped_axles` regions
/// unchanged, then one `grouped_axles` box per new envelope, then one
/// `single_axle` box per ungrouped axle. New regions carry float corners.
/// Images missing from `groups` keep only their non-axle and pre-existing
/// grouped regions.
///
/// Pre-existing `grouped_axles` regions are kept rather than replaced: only
/// `single_axle` regions feed the sweep, so dropping them would lose groups
/// made by an earlier pass. Keeping them makes merging a merged document a
/// no-op. Remove them from the document first to get a pure replacement.
///
/// # Errors
///
/// Returns `MissingField("images")` if the document has no image list.
pub fn update_annotations(
    mut document: AnnotationDocument,
    groups: &HashMap<String, AxleGroups>,
) -> Result<AnnotationDocument> {
    for image in document.images_mut()? {
        let regions = std::mem::take(&mut image.annotated_regions);
        let (axles, mut updated): (Vec<Region>, Vec<Region>) =
            regions.into_iter().partition(Region::is_axle);

        updated.extend(axles.into_iter().filter(|r| !r.is_single_axle()));

        if let Some(image_groups) = groups.get(&image.location) {
            updated.extend(
                image_groups
                    .grouped
                    .iter()
                    .map(|&bbox| Region::new_box(GROUPED_AXLES_TAG, bbox)),
            );
            updated.extend(
                image_groups
                    .ungrouped
                    .iter()
                    .map(|&bbox| Region::new_box(SINGLE_AXLE_TAG, bbox)),
            );
        }

        image.annotated_regions = updated;
    }

    Ok(document)
}

/// Merge contiguous single axles of a whole document into grouped axles.
///
/// # Errors
///
/// Fails fast with `MissingField("images")` when the document has no image
/// list, or `InvalidConfig` when the configuration is rejected.
pub fn merge_axle_trees(
    document: AnnotationDocument,
    config: &GroupingConfig,
) -> Result<AnnotationDocument> {
    config.validate()?;

    let boxes_by_image = extract_single_axle_boxes(&document)?;
    let groups = group_axles(&boxes_by_image, config.overlap_threshold);

    GroupingStats::from_groups(&boxes_by_image, &groups).log_summary();

    update_annotations(document, &groups)
}
