//! ONNX Runtime inference for the classifier.
//!
//! This module holds the tensor descriptors a model exposes, the session helpers,
//! and [`OrtInfer`], the production implementation of the `InferenceEngine` trait.

pub mod ort_infer;
pub mod session;
pub mod spec;

pub use ort_infer::{OrtInfer, PIXEL_SCALE_METADATA_KEY, flatten_scores, resolve_pixel_scale};
pub use session::load_session;
pub use spec::{DYNAMIC_DIM, InputTensorSpec, OutputTensorSpec, TensorDtype, TensorSpec};
