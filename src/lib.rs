//! # skinscan
//!
//! Single-model image classification core for skin-condition photographs, backed by
//! ONNX Runtime.
//!
//! An uploaded image is decoded, resized to the model's fixed input size and turned into
//! a `(1, H, W, 3)` `f32` tensor. One forward pass yields a score per class, and the
//! highest-scoring class is reported together with its raw score.
//!
//! ## Features
//!
//! - Model loaded once at start-up and shared read-only across requests
//! - Readiness tracking: a missing or incompatible model never takes the process down
//! - Deterministic preprocessing with a configurable pixel scale
//! - Request handling with client/server fault classification and scrubbed error bodies
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling, ONNX Runtime integration
//! * [`domain`] - Class taxonomy and prediction results
//! * [`models`] - Model loading and readiness
//! * [`pipeline`] - Classifier and request handler
//! * [`processors`] - Image preprocessing and score interpretation
//! * [`utils`] - Image decoding helpers and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use skinscan::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClassifierConfig::from_json_file("skinscan.json")?;
//! let classifier = Arc::new(Classifier::from_config(&config)?);
//! let handler = RequestHandler::new(classifier);
//!
//! let bytes = std::fs::read("lesion.jpg")?;
//! let outcome = handler.handle(Some(Upload::new("lesion.jpg", bytes)));
//! println!("{} {}", outcome.response.status, outcome.response.body_json());
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod models;

pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use skinscan::prelude::*;
/// ```
///
/// Covers configuration, the classifier and request handler, results and errors. For
/// engine-level customization import from `skinscan::core` directly.
pub mod prelude {
    // Configuration
    pub use crate::core::config::ClassifierConfig;

    // Pipeline
    pub use crate::pipeline::{
        Classifier, ClassifyResponse, HandlerOutcome, ReadinessReport, RequestHandler,
        RequestStage, ResponseBody, Upload,
    };

    // Results
    pub use crate::domain::{ClassTaxonomy, PredictionResult};
    pub use crate::models::{ModelHandle, ModelState};

    // Error Handling
    pub use crate::core::{ClassifyError, ClassifyResult};
}
