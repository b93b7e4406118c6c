//! # axle-eval
//!
//! A Rust library for post-processing and evaluating vehicle axle
//! detections.
//!
//! This library provides:
//! - **Axle grouping**: merging single-axle boxes that touch along the X
//!   axis into grouped-axle boxes
//! - **Greedy IoU matching** of scored predictions against ground truth
//! - **Precision** and **Recall** swept over confidence thresholds
//!
//! ## Quick Start
//!
//! ```rust
//! use axle_eval::config::GroupingConfig;
//! use axle_eval::evaluator::evaluate_pr;
//! use axle_eval::grouping::merge_axle_trees;
//! use axle_eval::loader::load_from_string;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let annotations = load_from_string(r#"{"images": []}"#)?;
//! let merged = merge_axle_trees(annotations, &GroupingConfig::default())?;
//!
//! // let predictions = load_from_file("predictions.json")?;
//! let curve = evaluate_pr(&merged, &merged, 10, 0.5)?;
//! for point in &curve {
//!     println!("{:.1}: P={:.2} R={:.2}", point.threshold, point.precision, point.recall);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Annotation Format
//!
//! ```json
//! {
//!   "images": [
//!     {
//!       "location": "truck_001.jpg",
//!       "annotated_regions": [
//!         {
//!           "tags": ["single_axle"],
//!           "region_type": "Box",
//!           "region": {"xmin": 10.0, "ymin": 40.0, "xmax": 30.0, "ymax": 60.0},
//!           "score": 0.95  // For predictions only
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod loader;
pub mod threshold;
pub mod metrics;
pub mod grouping;
pub mod matching;
pub mod evaluator;
pub mod stats;

// Re-export commonly used types and functions
pub use error::{AxleEvalError, Result};
pub use types::{
    AnnotationDocument, AxleGroups, BoundingBox, ImageAnnotation, ImageCounts,
    PrecisionRecallPoint, Region, ScoredBox, GROUPED_AXLES_TAG, SINGLE_AXLE_TAG,
};
pub use config::{EvaluationConfig, GroupingConfig};
pub use loader::{load_from_file, load_from_string, save_to_file, to_pretty_string};
pub use grouping::{group_axles, group_boxes, merge_axle_trees};
pub use matching::evaluate_image;
pub use evaluator::{evaluate_images, evaluate_pr, evaluate_pr_naive};
