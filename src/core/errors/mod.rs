//! Error types for the classification pipeline.
//!
//! Every component returns a [`ClassifyError`] instead of panicking. The request
//! boundary maps each variant to an [`ErrorClass`] and a fixed public message, so
//! internal diagnostics are logged but never handed back to the caller.
//!
//! # Usage
//!
//! ```rust
//! use skinscan::core::errors::{ClassifyError, ErrorClass};
//!
//! let error = ClassifyError::shape_mismatch("score vector", 25, 24);
//! assert_eq!(error.class(), ErrorClass::ServerFault);
//! assert_eq!(error.status_code(), 500);
//! ```

pub mod constructors;

use std::path::PathBuf;
use thiserror::Error;

/// Convenient result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Boxed error used as the source of wrapped failures.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Stage of image preparation in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Converting the decoded image to three colour channels.
    ColorConversion,
    /// Resizing to the model's input resolution.
    Resize,
    /// Building the `f32` input tensor.
    TensorConversion,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::ColorConversion => write!(f, "color conversion"),
            ProcessingStage::Resize => write!(f, "resize"),
            ProcessingStage::TensorConversion => write!(f, "tensor conversion"),
        }
    }
}

/// Who is at fault for an error, as seen from the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The upload itself was unusable (4xx).
    ClientFault,
    /// The service is misconfigured or failed internally (5xx).
    ServerFault,
}

/// Errors produced anywhere in the classification pipeline.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The model handle is not in the `Ready` state.
    #[error("model is not ready: {reason}")]
    ModelNotReady {
        /// Why the model is unavailable.
        reason: String,
    },

    /// The uploaded bytes are not a supported image encoding.
    #[error("image decode failed: {context}")]
    Decode {
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: BoxedError,
    },

    /// The image decoded but could not be turned into a model input tensor.
    #[error("{stage} failed: {context}")]
    Preprocess {
        /// The preparation stage that failed.
        stage: ProcessingStage,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: BoxedError,
    },

    /// The execution engine failed while running the model.
    #[error("inference failed for model '{model_name}': {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: BoxedError,
    },

    /// A tensor or score vector does not have the length/shape its counterpart requires.
    #[error("shape mismatch for {subject}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// What was being compared.
        subject: String,
        /// The expected shape or length.
        expected: String,
        /// The shape or length actually found.
        actual: String,
    },

    /// The model artifact could not be loaded or failed validation.
    #[error("failed to load model from '{}': {context}", path.display())]
    ModelLoad {
        /// Path of the artifact.
        path: PathBuf,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: BoxedError,
    },

    /// The upload was missing or empty.
    #[error("invalid upload: {message}")]
    InvalidUpload {
        /// A message describing the problem.
        message: String,
    },

    /// Configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },
}

impl ClassifyError {
    /// Returns whether the caller or the service is at fault.
    pub fn class(&self) -> ErrorClass {
        match self {
            ClassifyError::Decode { .. }
            | ClassifyError::Preprocess { .. }
            | ClassifyError::InvalidUpload { .. } => ErrorClass::ClientFault,
            _ => ErrorClass::ServerFault,
        }
    }

    /// HTTP-equivalent status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ClassifyError::ModelNotReady { .. } => 503,
            _ if self.class() == ErrorClass::ClientFault => 400,
            _ => 500,
        }
    }

    /// Message safe to return to the caller. Never includes internal diagnostics.
    pub fn public_message(&self) -> &'static str {
        match self {
            ClassifyError::ModelNotReady { .. } => "Model is not loaded. Check server logs.",
            ClassifyError::Decode { .. } => "The uploaded file is not a supported image.",
            ClassifyError::Preprocess { .. } => "The uploaded image could not be processed.",
            ClassifyError::InvalidUpload { .. } => "No image was uploaded.",
            _ => "Failed to process the image.",
        }
    }

    /// Renders the error together with its full source chain, for server-side logs.
    pub fn diagnostic(&self) -> String {
        let mut out = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str(": ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

/// Minimal error carrying only a message, used as a source where no library error exists.
#[derive(Debug, Clone)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleError {}

impl From<image::ImageError> for ClassifyError {
    fn from(error: image::ImageError) -> Self {
        Self::Decode {
            context: "unreadable image data".to_string(),
            source: Box::new(error),
        }
    }
}

impl From<ndarray::ShapeError> for ClassifyError {
    fn from(error: ndarray::ShapeError) -> Self {
        Self::Preprocess {
            stage: ProcessingStage::TensorConversion,
            context: "failed to shape input tensor".to_string(),
            source: Box::new(error),
        }
    }
}

impl From<serde_json::Error> for ClassifyError {
    fn from(error: serde_json::Error) -> Self {
        Self::ConfigError {
            message: format!("invalid JSON: {error}"),
        }
    }
}

impl From<crate::core::config::ConfigError> for ClassifyError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_faults_map_to_400() {
        let decode = ClassifyError::decode("not an image", SimpleError::new("bad magic"));
        assert_eq!(decode.class(), ErrorClass::ClientFault);
        assert_eq!(decode.status_code(), 400);

        let upload = ClassifyError::invalid_upload("empty payload");
        assert_eq!(upload.status_code(), 400);
    }

    #[test]
    fn test_server_faults_map_to_5xx() {
        let not_ready = ClassifyError::model_not_ready("unloaded");
        assert_eq!(not_ready.class(), ErrorClass::ServerFault);
        assert_eq!(not_ready.status_code(), 503);

        let mismatch = ClassifyError::shape_mismatch("score vector", 25, 3);
        assert_eq!(mismatch.status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_diagnostics() {
        let err = ClassifyError::inference(
            "model",
            "forward pass",
            SimpleError::new("CUDA out of memory at 0xdeadbeef"),
        );
        assert_eq!(err.public_message(), "Failed to process the image.");
        assert!(err.diagnostic().contains("0xdeadbeef"));
    }

    #[test]
    fn test_preprocess_stage_in_message() {
        let err = ClassifyError::preprocess(
            ProcessingStage::Resize,
            "resize produced unexpected dimensions",
            SimpleError::new("expected 128x128, got 0x0"),
        );
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().starts_with("resize failed"));

        let err: ClassifyError = ndarray::Array2::<f32>::from_shape_vec((2, 2), vec![0.0; 3])
            .unwrap_err()
            .into();
        assert!(matches!(
            err,
            ClassifyError::Preprocess {
                stage: ProcessingStage::TensorConversion,
                ..
            }
        ));
    }
}
