//! Trait for the model execution backend.
//!
//! The classifier only needs one capability from a backend: run a single prepared
//! tensor and hand back the score vector. Keeping that behind a trait lets the
//! model handle wrap ONNX Runtime in production and a scripted fake in tests.

use crate::core::errors::ClassifyError;
use crate::core::inference::{InputTensorSpec, OutputTensorSpec};
use crate::core::tensor::{ScoreVector, Tensor4D};
use std::fmt::Debug;

/// Trait for inference engine operations.
pub trait InferenceEngine: Send + Sync + Debug {
    /// Descriptor of the input slot the engine binds to.
    fn input_spec(&self) -> &InputTensorSpec;

    /// Descriptor of the output slot the engine reads from.
    fn output_spec(&self) -> &OutputTensorSpec;

    /// Runs exactly one forward pass on `input`.
    ///
    /// # Returns
    ///
    /// The dense score vector in taxonomy order, or an `Inference` error if the backend
    /// faults.
    fn infer(&self, input: &Tensor4D) -> Result<ScoreVector, ClassifyError>;

    /// Short description of the engine for logs.
    fn engine_info(&self) -> String;

    /// Checks that `input` matches the declared input shape.
    fn validate_inference_input(&self, input: &Tensor4D) -> Result<(), ClassifyError> {
        let spec = &self.input_spec().tensor;
        if !spec.accepts_shape(input.shape()) {
            return Err(ClassifyError::shape_mismatch(
                "input tensor",
                format!("{:?}", spec.shape),
                format!("{:?}", input.shape()),
            ));
        }
        Ok(())
    }
}
