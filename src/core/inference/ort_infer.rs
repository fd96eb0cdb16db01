//! ONNX Runtime inference engine for a single classification model.

use crate::core::errors::ClassifyError;
use crate::core::inference::{InputTensorSpec, OutputTensorSpec};
use crate::core::tensor::{ScoreVector, Tensor4D};
use crate::core::traits::InferenceEngine;
use ort::session::Session;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;
#[cfg(test)]
#[path = "ort_infer_tests.rs"]
mod ort_infer_tests;

pub use ort_infer_builders::resolve_pixel_scale;
pub use ort_infer_execution::flatten_scores;

/// Custom metadata key an artifact may use to declare its input pixel scale.
pub const PIXEL_SCALE_METADATA_KEY: &str = "pixel_scale";

/// Runs one ONNX classification model.
///
/// ONNX Runtime needs exclusive access to a session while it runs, so each session sits
/// behind its own mutex and requests are spread over the pool round-robin. Callers only
/// ever see `&self`; the descriptors are fixed at construction.
pub struct OrtInfer {
    pub(super) sessions: Vec<Mutex<Session>>,
    pub(super) next_idx: AtomicUsize,
    pub(super) input: InputTensorSpec,
    pub(super) output: OutputTensorSpec,
    pub(super) model_path: std::path::PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("sessions", &self.sessions.len())
            .field("input", &self.input)
            .field("output", &self.output)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Number of sessions in the pool.
    pub fn pool_size(&self) -> usize {
        self.sessions.len()
    }
}

/// Picks the next slot of a pool of `len` entries.
pub(super) fn next_slot(counter: &AtomicUsize, len: usize) -> usize {
    counter.fetch_add(1, Ordering::Relaxed) % len.max(1)
}

impl InferenceEngine for OrtInfer {
    fn input_spec(&self) -> &InputTensorSpec {
        &self.input
    }

    fn output_spec(&self) -> &OutputTensorSpec {
        &self.output
    }

    fn infer(&self, input: &Tensor4D) -> Result<ScoreVector, ClassifyError> {
        self.run(input)
    }

    fn engine_info(&self) -> String {
        format!(
            "onnxruntime model '{}' ({}, {} session(s))",
            self.model_name,
            self.model_path.display(),
            self.sessions.len()
        )
    }
}
