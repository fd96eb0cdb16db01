//! The core module of the classifier.
//!
//! This module contains the fundamental components the pipeline is built from:
//! - Configuration management
//! - Error handling
//! - ONNX Runtime integration and tensor descriptors
//! - The `InferenceEngine` trait
//! - Tensor type aliases

pub mod config;
pub mod errors;
pub mod inference;
pub mod tensor;
pub mod traits;

pub use config::{ClassifierConfig, ConfigError, ConfigValidator};
pub use errors::{ClassifyError, ClassifyResult, ErrorClass, ProcessingStage};
pub use inference::{InputTensorSpec, OrtInfer, OutputTensorSpec, TensorDtype, TensorSpec};
pub use tensor::{ScoreVector, Tensor4D};
pub use traits::InferenceEngine;
