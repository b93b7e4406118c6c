//! Run configuration for the grouping and evaluation engines.
//!
//! Both structs deserialize from JSON with every field optional; missing
//! fields take the defaults below.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{AxleEvalError, Result};
use crate::threshold::validate_threshold;

/// Default maximum gap along X for two axles to be merged.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.01;

/// Default number of threshold steps in a precision-recall sweep.
pub const DEFAULT_NUM_THRESHOLDS: usize = 10;

/// Default minimum IoU for a prediction to match a ground truth.
pub const DEFAULT_IOU_MIN: f64 = 0.5;

/// Default confidence threshold for single-threshold reports.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// A box joins a group when its `xmin` is at most the group's running
    /// `xmax` plus this value.
    pub overlap_threshold: f64,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
        }
    }
}

impl GroupingConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Negative or non-finite thresholds are rejected.
    pub fn validate(&self) -> Result<()> {
        if !self.overlap_threshold.is_finite() || self.overlap_threshold < 0.0 {
            return Err(AxleEvalError::InvalidConfig(format!(
                "overlap_threshold must be a finite non-negative number, got {}",
                self.overlap_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Sweep uses thresholds `0, 1/n, ..., 1`.
    pub num_thresholds: usize,
    pub iou_min: f64,
    /// Threshold for the per-image report.
    pub score_threshold: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            num_thresholds: DEFAULT_NUM_THRESHOLDS,
            iou_min: DEFAULT_IOU_MIN,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }
}

impl EvaluationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_thresholds == 0 {
            return Err(AxleEvalError::InvalidConfig(
                "num_thresholds must be greater than 0".to_string(),
            ));
        }
        validate_threshold(self.iou_min)
            .map_err(|e| AxleEvalError::InvalidConfig(format!("iou_min: {}", e)))?;
        validate_threshold(self.score_threshold)
            .map_err(|e| AxleEvalError::InvalidConfig(format!("score_threshold: {}", e)))?;
        Ok(())
    }
}
