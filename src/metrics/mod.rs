//! Metrics calculation modules for detection evaluation.

pub mod iou;
pub mod precision_recall;

pub use iou::calculate_iou;
pub use precision_recall::{calculate_precision_recall, PrecisionRecall};
