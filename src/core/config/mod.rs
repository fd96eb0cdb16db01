//! Configuration types for the classifier.
//!
//! - [`classifier`]: the start-up configuration file (model, preprocessing, taxonomy)
//! - [`onnx`]: ONNX Runtime session options
//! - [`errors`]: configuration errors and validation

pub mod classifier;
pub mod errors;
pub mod onnx;

pub use classifier::{ClassifierConfig, ModelConfig, PreprocessConfig, TaxonomyConfig};
pub use errors::{ConfigError, ConfigValidator};
pub use onnx::{OrtGraphOptimizationLevel, OrtSessionConfig};
