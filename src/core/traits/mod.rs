//! Traits at the seams of the pipeline.

pub mod granular;

pub use granular::InferenceEngine;
