//! Helper constructors for [`ClassifyError`].

use super::{ClassifyError, ProcessingStage};
use std::path::Path;

impl ClassifyError {
    /// Creates a `ModelNotReady` error.
    pub fn model_not_ready(reason: impl Into<String>) -> Self {
        Self::ModelNotReady {
            reason: reason.into(),
        }
    }

    /// Creates a `Decode` error.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn decode(context: &str, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode {
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a `Preprocess` error for the given stage.
    ///
    /// # Arguments
    ///
    /// * `stage` - The preparation stage that failed.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn preprocess(
        stage: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Preprocess {
            stage,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an `Inference` error.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model that failed.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn inference(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a `ShapeMismatch` error.
    pub fn shape_mismatch(
        subject: &str,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        Self::ShapeMismatch {
            subject: subject.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Creates a `ModelLoad` error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the model artifact.
    /// * `context` - What was being attempted.
    /// * `error` - The underlying error that caused this error.
    pub fn model_load(
        path: &Path,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates an `InvalidUpload` error.
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        Self::InvalidUpload {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates a configuration error naming the offending field.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::ConfigError {
            message: format!(
                "Configuration error in field '{}' with value '{}': {}",
                field, value, reason
            ),
        }
    }
}
