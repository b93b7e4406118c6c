//! Tests for loader and type modules.
//!
//! Tests for BoundingBox, Region, document loading and saving.

use axle_eval::loader::{load_from_file, load_from_string, save_to_file, to_pretty_string};
use axle_eval::types::{AnnotationDocument, BoundingBox, ImageAnnotation, Region, ScoredBox};
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLE: &str = r#"{
    "images": [
        {
            "location": "truck_001.jpg",
            "annotated_regions": [
                {"tags": ["car"], "region_type": "Box", "region": {"xmin": 0, "ymin": 0, "xmax": 640, "ymax": 300}},
                {"tags": ["single_axle"], "region_type": "Box", "region": {"xmin": 100.5, "ymin": 250, "xmax": 140, "ymax": 290}, "score": 0.87}
            ]
        },
        {
            "location": "truck_002.jpg",
            "annotated_regions": []
        }
    ],
    "version": 3
}"#;

#[test]
fn test_bounding_box_new() {
    let bbox = BoundingBox::new(10.0, 20.0, 30.0, 60.0);
    assert_eq!(bbox.xmin, 10.0);
    assert_eq!(bbox.ymax, 60.0);
    assert_eq!(bbox.width(), 20.0);
    assert_eq!(bbox.height(), 40.0);
    assert_eq!(bbox.area(), 800.0);
}

#[test]
fn test_bounding_box_is_valid() {
    assert!(BoundingBox::new(0.0, 0.0, 0.0, 0.0).is_valid());
    assert!(!BoundingBox::new(10.0, 0.0, 5.0, 10.0).is_valid());
    assert!(!BoundingBox::new(0.0, 10.0, 10.0, 5.0).is_valid());
}

#[test]
fn test_envelope_single_box() {
    let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(BoundingBox::envelope(&[bbox]), Some(bbox));
}

#[test]
fn test_load_sample() {
    let document = load_from_string(SAMPLE).unwrap();
    let images = document.images().unwrap();

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].location, "truck_001.jpg");
    assert_eq!(images[0].annotated_regions[0].bbox().unwrap().xmax, 640.0);
    assert_eq!(images[0].annotated_regions[0].region["xmax"], 640);
    assert_eq!(images[0].annotated_regions[0].score, None);
    assert_eq!(images[0].annotated_regions[1].to_scored_box().unwrap().score, 0.87);
    assert!(images[1].annotated_regions.is_empty());
    assert_eq!(document.extra["version"], 3);
}

#[test]
fn test_region_conversions() {
    let document = load_from_string(SAMPLE).unwrap();
    let image = &document.images().unwrap()[0];

    let gt = image.ground_truth_boxes().unwrap();
    assert_eq!(gt.len(), 2);
    assert_eq!(gt[1], BoundingBox::new(100.5, 250.0, 140.0, 290.0));

    // The car region has no score, so the image is not a valid prediction image.
    assert!(image.predicted_boxes().is_err());

    let scored = image.annotated_regions[1].to_scored_box().unwrap();
    assert_eq!(scored, ScoredBox::new(gt[1], 0.87));
}

#[test]
fn test_new_box_shape() {
    let region = Region::new_box("grouped_axles", BoundingBox::new(1.0, 2.0, 3.0, 4.0));
    let value = serde_json::to_value(&region).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "tags": ["grouped_axles"],
            "region_type": "Box",
            "region": {"xmin": 1.0, "ymin": 2.0, "xmax": 3.0, "ymax": 4.0}
        })
    );
}

#[test]
fn test_save_keeps_region_as_written() {
    let document = load_from_string(SAMPLE).unwrap();
    let file = NamedTempFile::new().unwrap();
    save_to_file(&document, file.path()).unwrap();

    let original: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(original, saved);
}

#[test]
fn test_file_round_trip() {
    let document = load_from_string(SAMPLE).unwrap();
    let file = NamedTempFile::new().unwrap();

    save_to_file(&document, file.path()).unwrap();
    let reloaded = load_from_file(file.path()).unwrap();
    assert_eq!(document, reloaded);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", SAMPLE).unwrap();

    let document = load_from_file(file.path()).unwrap();
    assert_eq!(document.images().unwrap().len(), 2);
}

#[test]
fn test_pretty_string() {
    let document = AnnotationDocument::new(vec![ImageAnnotation::new("a.jpg", vec![])]);
    let pretty = to_pretty_string(&document).unwrap();
    assert!(pretty.contains("        \"annotated_regions\": []"));
    assert!(pretty.find("annotated_regions").unwrap() < pretty.find("location").unwrap());
}
