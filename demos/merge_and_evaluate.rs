//! Merge example axle annotations, then evaluate predictions against them.

use axle_eval::{
    evaluate_images, evaluate_pr, load_from_string, merge_axle_trees, to_pretty_string,
    GroupingConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Axle Evaluation Example ===\n");

    println!("1. Merging contiguous axles");
    let annotations = load_from_string(
        r#"{
        "images": [
            {
                "location": "truck_001.jpg",
                "annotated_regions": [
                    {"tags": ["car"], "region_type": "Box", "region": {"xmin": 0, "ymin": 0, "xmax": 600, "ymax": 300}},
                    {"tags": ["single_axle"], "region_type": "Box", "region": {"xmin": 100, "ymin": 240, "xmax": 150, "ymax": 290}},
                    {"tags": ["single_axle"], "region_type": "Box", "region": {"xmin": 150, "ymin": 242, "xmax": 200, "ymax": 292}},
                    {"tags": ["single_axle"], "region_type": "Box", "region": {"xmin": 450, "ymin": 240, "xmax": 500, "ymax": 290}}
                ]
            }
        ]
    }"#,
    )?;
    let ground_truth = merge_axle_trees(annotations, &GroupingConfig::default())?;
    println!("{}\n", to_pretty_string(&ground_truth)?);

    println!("2. Evaluating predictions");
    let predictions = load_from_string(
        r#"{
        "images": [
            {
                "location": "truck_001.jpg",
                "annotated_regions": [
                    {"tags": ["grouped_axles"], "region_type": "Box", "region": {"xmin": 102, "ymin": 240, "xmax": 198, "ymax": 292}, "score": 0.92},
                    {"tags": ["single_axle"], "region_type": "Box", "region": {"xmin": 452, "ymin": 241, "xmax": 500, "ymax": 290}, "score": 0.64},
                    {"tags": ["single_axle"], "region_type": "Box", "region": {"xmin": 300, "ymin": 240, "xmax": 350, "ymax": 290}, "score": 0.31}
                ]
            }
        ]
    }"#,
    )?;

    for image in evaluate_images(&ground_truth, &predictions, 0.5, 0.5)? {
        println!(
            "   {}: TP={} FN={} FP={}",
            image.location,
            image.counts.true_positives,
            image.counts.false_negatives,
            image.counts.false_positives
        );
    }
    println!();

    println!("3. Precision-recall sweep");
    for point in evaluate_pr(&ground_truth, &predictions, 10, 0.5)? {
        println!(
            "   Threshold {:.1} -> P={:.2}, R={:.2}",
            point.threshold, point.precision, point.recall
        );
    }

    Ok(())
}
