//! Helpers for working directly with ONNX Runtime sessions.

use crate::core::config::{OrtGraphOptimizationLevel, OrtSessionConfig};
use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::inference::{TensorDtype, TensorSpec};
use ort::logging::LogLevel;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::tensor::TensorElementType;
use ort::value::ValueType;
use std::path::Path;

/// Creates an ONNX Runtime session for the artifact at `model_path`.
pub fn load_session(
    model_path: impl AsRef<Path>,
    config: Option<&OrtSessionConfig>,
) -> ClassifyResult<Session> {
    let path = model_path.as_ref();
    let builder_error =
        |e: ort::Error| ClassifyError::model_load(path, "failed to configure ONNX session", e);

    let builder = Session::builder()
        .and_then(|b| b.with_log_level(LogLevel::Error))
        .map_err(builder_error)?;
    let builder = match config {
        Some(cfg) => apply_ort_config(builder, cfg).map_err(builder_error)?,
        None => builder,
    };

    builder.commit_from_file(path).map_err(|e| {
        ClassifyError::model_load(
            path,
            "failed to create ONNX session; verify the file exists and is a valid ONNX model",
            e,
        )
    })
}

/// Applies session options to a builder.
pub fn apply_ort_config(
    mut builder: SessionBuilder,
    config: &OrtSessionConfig,
) -> Result<SessionBuilder, ort::Error> {
    if let Some(threads) = config.intra_threads {
        builder = builder.with_intra_threads(threads)?;
    }
    if let Some(threads) = config.inter_threads {
        builder = builder.with_inter_threads(threads)?;
    }
    if let Some(enable) = config.enable_mem_pattern {
        builder = builder.with_memory_pattern(enable)?;
    }
    let level = match config.get_optimization_level() {
        OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
        OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
        OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
        OrtGraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
    };
    builder.with_optimization_level(level)
}

/// Builds a [`TensorSpec`] from a session input or output description.
pub fn describe_value(name: &str, index: usize, value_type: &ValueType) -> TensorSpec {
    match value_type {
        ValueType::Tensor { ty, shape, .. } => TensorSpec {
            name: name.to_string(),
            index,
            shape: shape.iter().copied().collect(),
            dtype: if *ty == TensorElementType::Float32 {
                TensorDtype::Float32
            } else {
                TensorDtype::Other(format!("{ty:?}"))
            },
        },
        other => TensorSpec {
            name: name.to_string(),
            index,
            shape: Vec::new(),
            dtype: TensorDtype::Other(format!("{other:?}")),
        },
    }
}
