//! Statistics tracking for axle grouping runs
//!
//! This module provides counters describing what a merge pass did to a
//! document, for logging and for callers that want to report on it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::AxleGroups;

/// Statistics collected during a grouping pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupingStats {
    /// Number of images processed
    pub images_processed: usize,

    /// Number of single axle boxes fed into the grouping sweep
    pub single_axles_in: usize,

    /// Number of grouped-axle envelopes produced
    pub grouped_boxes_out: usize,

    /// Number of single axles merged into some envelope
    pub axles_merged: usize,

    /// Number of single axles left ungrouped
    pub ungrouped_boxes_out: usize,

    /// Number of images with no single axle at all
    pub images_without_axles: usize,
}

impl GroupingStats {
    /// Create a new `GroupingStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for one image
    pub fn record_image(&mut self, input_boxes: usize, groups: &AxleGroups) {
        self.images_processed += 1;
        self.single_axles_in += input_boxes;
        self.grouped_boxes_out += groups.grouped.len();
        self.ungrouped_boxes_out += groups.ungrouped.len();
        self.axles_merged += input_boxes.saturating_sub(groups.ungrouped.len());
        if input_boxes == 0 {
            self.images_without_axles += 1;
        }
    }

    /// Build statistics from the grouping input and output maps
    pub fn from_groups<B>(
        inputs: &HashMap<String, Vec<B>>,
        groups: &HashMap<String, AxleGroups>,
    ) -> Self {
        let mut stats = Self::new();
        for (location, boxes) in inputs {
            let image_groups = groups.get(location).cloned().unwrap_or_default();
            stats.record_image(boxes.len(), &image_groups);
        }
        stats
    }

    /// Log a summary of the statistics at info level
    pub fn log_summary(&self) {
        log::info!("{}", self.summary_string());
        if self.images_without_axles > 0 {
            log::debug!("{} image(s) had no single axle regions", self.images_without_axles);
        }
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "GroupingStats {{ images: {}, single_in: {}, grouped_out: {}, merged: {}, ungrouped_out: {} }}",
            self.images_processed,
            self.single_axles_in,
            self.grouped_boxes_out,
            self.axles_merged,
            self.ungrouped_boxes_out
        )
    }
}
