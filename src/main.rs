//! Command line entry point: merge axle annotations or evaluate predictions.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::{info, warn};

use axle_eval::config::{EvaluationConfig, GroupingConfig};
use axle_eval::evaluator::{evaluate_images, evaluate_pr_naive, evaluate_with_config};
use axle_eval::grouping::merge_axle_trees;
use axle_eval::loader::{load_from_file, save_to_file, to_pretty_string};

#[derive(Parser, Debug)]
#[command(name = "axle-eval", version, about = "Group axle annotations and evaluate axle detections")]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge contiguous single axles into grouped axles
    Merge {
        input: PathBuf,
        output: PathBuf,
        /// JSON file with grouping settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Maximum X gap for two axles to be merged
        #[arg(long)]
        overlap_threshold: Option<f64>,
        /// Print the merged document
        #[arg(long)]
        print: bool,
    },
    /// Compute a precision-recall sweep of predictions against ground truth
    Evaluate {
        ground_truth: PathBuf,
        predictions: PathBuf,
        /// JSON file with evaluation settings
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of threshold steps (N gives N+1 thresholds)
        #[arg(short = 'n', long)]
        thresholds: Option<usize>,
        #[arg(long)]
        iou_min: Option<f64>,
        /// Confidence threshold for the per-image report
        #[arg(long)]
        score_threshold: Option<f64>,
        /// Report TP/FN/FP for every image
        #[arg(long)]
        per_image: bool,
        /// Also run the unoptimized sweep and compare
        #[arg(long)]
        naive: bool,
    },
}

fn setup_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    setup_logger(cli.verbose);

    match cli.command {
        Command::Merge { input, output, config, overlap_threshold, print } => {
            let mut grouping = match config {
                Some(path) => GroupingConfig::from_file(path)?,
                None => GroupingConfig::default(),
            };
            if let Some(threshold) = overlap_threshold {
                grouping.overlap_threshold = threshold;
            }

            let document = load_from_file(&input)?;
            let merged = merge_axle_trees(document, &grouping)?;
            if print {
                println!("{}", to_pretty_string(&merged)?);
            }
            save_to_file(&merged, &output)?;
            info!("wrote {}", output.display());
        }
        Command::Evaluate {
            ground_truth,
            predictions,
            config,
            thresholds,
            iou_min,
            score_threshold,
            per_image,
            naive,
        } => {
            let mut evaluation = match config {
                Some(path) => EvaluationConfig::from_file(path)?,
                None => EvaluationConfig::default(),
            };
            if let Some(n) = thresholds {
                evaluation.num_thresholds = n;
            }
            if let Some(iou) = iou_min {
                evaluation.iou_min = iou;
            }
            if let Some(score) = score_threshold {
                evaluation.score_threshold = score;
            }
            let gt = load_from_file(&ground_truth)?;
            let pred = load_from_file(&predictions)?;

            let start = Instant::now();
            let curve = evaluate_with_config(&gt, &pred, &evaluation)?;
            info!("sweep computed in {:.2?}", start.elapsed());

            if per_image {
                for image in evaluate_images(&gt, &pred, evaluation.score_threshold, evaluation.iou_min)? {
                    if !image.has_predictions {
                        warn!("no prediction found for {}", image.location);
                    }
                    println!(
                        "{}: TP={} FN={} FP={}",
                        image.location,
                        image.counts.true_positives,
                        image.counts.false_negatives,
                        image.counts.false_positives
                    );
                }
            }

            if naive {
                let start = Instant::now();
                let reference = evaluate_pr_naive(&gt, &pred, evaluation.num_thresholds, evaluation.iou_min)?;
                info!("naive sweep computed in {:.2?}", start.elapsed());
                if reference != curve {
                    warn!("naive and optimized sweeps disagree");
                }
            }

            for point in &curve {
                println!(
                    "Threshold {:.2} -> P={:.4}, R={:.4}",
                    point.threshold, point.precision, point.recall
                );
            }
        }
    }

    Ok(())
}
