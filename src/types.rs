//! Core data types for axle annotation documents and evaluation results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::ops::{Add, AddAssign};

use crate::error::{AxleEvalError, Result};

/// Tag carried by a region holding one axle.
pub const SINGLE_AXLE_TAG: &str = "single_axle";

/// Tag carried by a region enclosing two or more contiguous axles.
pub const GROUPED_AXLES_TAG: &str = "grouped_axles";

/// The only region type produced by this crate.
pub const BOX_REGION_TYPE: &str = "Box";

/// Axis-aligned bounding box in corner format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Check that the corners are ordered (`xmin <= xmax`, `ymin <= ymax`).
    pub fn is_valid(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }

    /// Read the four corners of a raw `region` object.
    ///
    /// Integer coordinates are widened to `f64`; other keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` if a corner is missing or not a number.
    pub fn from_region(region: &Map<String, Value>) -> Result<Self> {
        let corner = |key: &str| -> Result<f64> {
            let value = region.get(key).ok_or_else(|| {
                AxleEvalError::InvalidRegion(format!("region is missing '{}'", key))
            })?;
            value.as_f64().ok_or_else(|| {
                AxleEvalError::InvalidRegion(format!("'{}' is not a number: {}", key, value))
            })
        };
        Ok(Self::new(corner("xmin")?, corner("ymin")?, corner("xmax")?, corner("ymax")?))
    }

    /// Raw `region` object holding the corners as floats.
    pub fn to_region(&self) -> Map<String, Value> {
        let mut region = Map::new();
        region.insert("xmin".to_string(), Value::from(self.xmin));
        region.insert("ymin".to_string(), Value::from(self.ymin));
        region.insert("xmax".to_string(), Value::from(self.xmax));
        region.insert("ymax".to_string(), Value::from(self.ymax));
        region
    }

    /// Smallest box containing every box in `boxes`, or `None` when empty.
    pub fn envelope(boxes: &[BoundingBox]) -> Option<BoundingBox> {
        let (first, rest) = boxes.split_first()?;
        Some(rest.iter().fold(*first, |acc, b| BoundingBox {
            xmin: acc.xmin.min(b.xmin),
            ymin: acc.ymin.min(b.ymin),
            xmax: acc.xmax.max(b.xmax),
            ymax: acc.ymax.max(b.ymax),
        }))
    }
}

/// A bounding box with the detector confidence attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredBox {
    pub bbox: BoundingBox,
    pub score: f64,
}

impl ScoredBox {
    pub fn new(bbox: BoundingBox, score: f64) -> Self {
        Self { bbox, score }
    }
}

/// A tagged region of an image.
///
/// The `region` object is kept as written, unknown keys and integer
/// coordinates included, and only read as a [`BoundingBox`] on use. Keys
/// this crate does not know about are kept in `extra`, so a region the
/// grouping engine does not rewrite survives a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub tags: Vec<String>,
    pub region_type: String,
    pub region: Map<String, Value>,
    /// Confidence score (for predictions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Number>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Region {
    /// Create a `"Box"` region with a single tag.
    pub fn new_box(tag: &str, bbox: BoundingBox) -> Self {
        Self {
            tags: vec![tag.to_string()],
            region_type: BOX_REGION_TYPE.to_string(),
            region: bbox.to_region(),
            score: None,
            extra: Map::new(),
        }
    }

    /// Create a scored `"Box"` region, as found in prediction documents.
    ///
    /// A non-finite score cannot be represented in JSON and is left out.
    pub fn new_scored_box(tag: &str, bbox: BoundingBox, score: f64) -> Self {
        Self {
            score: Number::from_f64(score),
            ..Self::new_box(tag, bbox)
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_single_axle(&self) -> bool {
        self.has_tag(SINGLE_AXLE_TAG)
    }

    /// True for regions the grouping engine rewrites.
    pub fn is_axle(&self) -> bool {
        self.is_single_axle() || self.has_tag(GROUPED_AXLES_TAG)
    }

    /// Read the region's box.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRegion` if the `region` object lacks a numeric corner.
    pub fn bbox(&self) -> Result<BoundingBox> {
        BoundingBox::from_region(&self.region)
    }

    /// Convert a prediction region into a [`ScoredBox`].
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if the region carries no score, or
    /// `InvalidRegion` if its box cannot be read.
    pub fn to_scored_box(&self) -> Result<ScoredBox> {
        let score = self
            .score
            .as_ref()
            .and_then(Number::as_f64)
            .ok_or_else(|| AxleEvalError::MissingField("score".to_string()))?;
        Ok(ScoredBox::new(self.bbox()?, score))
    }
}

/// Annotations for one image, keyed by its location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnnotation {
    pub location: String,
    pub annotated_regions: Vec<Region>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageAnnotation {
    pub fn new(location: impl Into<String>, annotated_regions: Vec<Region>) -> Self {
        Self {
            location: location.into(),
            annotated_regions,
            extra: Map::new(),
        }
    }

    /// Every region of the image as a ground-truth box, in document order.
    pub fn ground_truth_boxes(&self) -> Result<Vec<BoundingBox>> {
        self.annotated_regions
            .iter()
            .map(|r| r.bbox().map_err(|e| self.in_image(e)))
            .collect()
    }

    /// Every region of the image as a scored prediction, in document order.
    pub fn predicted_boxes(&self) -> Result<Vec<ScoredBox>> {
        self.annotated_regions
            .iter()
            .map(|r| r.to_scored_box().map_err(|e| self.in_image(e)))
            .collect()
    }

    /// Name this image in a region error.
    pub(crate) fn in_image(&self, err: AxleEvalError) -> AxleEvalError {
        match err {
            AxleEvalError::MissingField(field) => AxleEvalError::MissingField(format!(
                "{} (region in image '{}')",
                field, self.location
            )),
            AxleEvalError::InvalidRegion(msg) => {
                AxleEvalError::InvalidRegion(format!("{} (image '{}')", msg, self.location))
            }
            other => other,
        }
    }
}

/// A whole annotation document.
///
/// `images` is optional at the serde level so that a document without it
/// is reported as a schema error by [`AnnotationDocument::images`] rather
/// than as an opaque parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageAnnotation>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnnotationDocument {
    pub fn new(images: Vec<ImageAnnotation>) -> Self {
        Self {
            images: Some(images),
            extra: Map::new(),
        }
    }

    /// Get the image list.
    ///
    /// # Errors
    ///
    /// Returns `MissingField("images")` when the document has no image list.
    pub fn images(&self) -> Result<&[ImageAnnotation]> {
        self.images
            .as_deref()
            .ok_or_else(|| AxleEvalError::MissingField("images".to_string()))
    }

    /// Mutable access to the image list, with the same schema check.
    pub fn images_mut(&mut self) -> Result<&mut Vec<ImageAnnotation>> {
        self.images
            .as_mut()
            .ok_or_else(|| AxleEvalError::MissingField("images".to_string()))
    }
}

/// Grouping result for one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxleGroups {
    /// Envelopes of every group of two or more contiguous boxes.
    pub grouped: Vec<BoundingBox>,
    /// Boxes that joined no group, unchanged, in `xmin` order.
    pub ungrouped: Vec<BoundingBox>,
}

/// True positive / false negative / false positive counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageCounts {
    pub true_positives: usize,
    pub false_negatives: usize,
    pub false_positives: usize,
}

impl ImageCounts {
    pub fn new(true_positives: usize, false_negatives: usize, false_positives: usize) -> Self {
        Self {
            true_positives,
            false_negatives,
            false_positives,
        }
    }
}

impl Add for ImageCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            true_positives: self.true_positives + rhs.true_positives,
            false_negatives: self.false_negatives + rhs.false_negatives,
            false_positives: self.false_positives + rhs.false_positives,
        }
    }
}

impl AddAssign for ImageCounts {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// One point of a precision-recall sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrecisionRecallPoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
}
