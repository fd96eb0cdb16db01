//! Command-line front end for the skin-condition classifier.
//!
//! Runs every image through the same request handler a web service would use and prints
//! one JSON line per image.
//!
//! Usage:
//! ```
//! skinscan --config skinscan.json <image_paths>...
//! skinscan --model models/model.onnx --top-k 3 <image_paths>...
//! skinscan --config skinscan.json --health
//! ```

use clap::Parser;
use skinscan::core::ConfigValidator;
use skinscan::prelude::*;
use skinscan::utils::init_tracing;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Command-line arguments for the classifier
#[derive(Parser)]
#[command(name = "skinscan")]
#[command(about = "Classifies skin-condition photographs with an ONNX model")]
struct Args {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the model file (overrides the configuration)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Path to a labels file (overrides the configuration)
    #[arg(short, long)]
    labels: Option<PathBuf>,

    /// Number of ranked predictions per image (overrides the configuration)
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Print the readiness report and exit
    #[arg(long)]
    health: bool,

    /// Image file paths to process
    #[arg(required_unless_present = "health")]
    images: Vec<PathBuf>,
}

fn load_config(args: &Args) -> Result<ClassifierConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ClassifierConfig::from_json_file(path)?,
        None => ClassifierConfig::default(),
    };

    if let Some(model) = &args.model {
        config.model.path = model.clone();
    }
    if let Some(labels) = &args.labels {
        config.taxonomy.labels = None;
        config.taxonomy.labels_path = Some(labels.clone());
    }
    if let Some(top_k) = args.top_k {
        config.top_k = top_k;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args = Args::parse();
    let config = load_config(&args)?;

    info!("Loading model from {}", config.model.path.display());
    let classifier = Arc::new(Classifier::from_config(&config)?);
    let handler = RequestHandler::new(classifier);

    let readiness = handler.readiness();
    if args.health {
        println!("{}", serde_json::to_string(&readiness)?);
        if readiness.ready {
            return Ok(());
        }
        return Err("model is not ready".into());
    }

    if !readiness.ready {
        warn!("Model is {}; requests will be rejected", readiness.status);
    }

    let mut failures = 0usize;
    for (i, image_path) in args.images.iter().enumerate() {
        info!(
            "Processing image {} of {}: {}",
            i + 1,
            args.images.len(),
            image_path.display()
        );

        let upload = match read_upload(image_path) {
            Ok(upload) => upload,
            Err(e) => {
                error!("Failed to read {}: {}", image_path.display(), e);
                failures += 1;
                continue;
            }
        };

        let outcome = handler.handle(Some(upload));
        if !outcome.response.is_success() {
            failures += 1;
        }
        println!(
            "{}\t{}\t{}",
            image_path.display(),
            outcome.response.status,
            outcome.response.body_json()
        );
    }

    if failures > 0 {
        error!("{} of {} images failed", failures, args.images.len());
        return Err(format!("{failures} image(s) failed").into());
    }
    Ok(())
}

fn read_upload(path: &Path) -> std::io::Result<Upload> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Upload::new(filename, bytes))
}
