//! Request boundary for the classifier.
//!
//! The transport layer hands each upload to [`RequestHandler::handle`] and writes the
//! returned status and JSON body back to the client. A request moves through
//! `Received → Validated → Preprocessed → Inferred → Interpreted → Responded`, or jumps to
//! `Errored` from any stage; no partial result is ever returned.

use super::classifier::Classifier;
use crate::core::errors::{ClassifyError, ClassifyResult, ErrorClass};
use crate::domain::PredictionResult;
use crate::utils::sniff_format;
use image::ImageFormat;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Stages of a classification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestStage {
    /// The request reached the handler.
    Received,
    /// The model is ready and the upload is present and non-empty.
    Validated,
    /// The upload decoded into an input tensor.
    Preprocessed,
    /// The forward pass produced a score vector.
    Inferred,
    /// Scores were ranked against the taxonomy.
    Interpreted,
    /// A success response was built.
    Responded,
    /// A stage failed and an error response was built.
    Errored,
}

/// A file upload as received from the transport layer.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    /// Client-supplied filename.
    pub filename: String,
    /// Client-declared content type, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Creates an upload without a declared content type.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    /// Sets the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A validated upload, owned by one request for its lifetime.
#[derive(Debug)]
pub struct UploadedImage {
    /// Client-supplied filename.
    pub filename: String,
    /// Client-declared content type.
    pub declared_format: Option<String>,
    /// Format guessed from the bytes.
    pub sniffed_format: Option<ImageFormat>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// One entry of a success response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionEntry {
    /// Class name.
    pub class: String,
    /// Raw model score for the class.
    pub confidence: f32,
}

impl From<PredictionResult> for PredictionEntry {
    fn from(prediction: PredictionResult) -> Self {
        Self {
            class: prediction.class_name,
            confidence: prediction.confidence,
        }
    }
}

/// JSON body returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// `{"predictions": [...]}`
    Predictions { predictions: Vec<PredictionEntry> },
    /// `{"error": "..."}`
    Error { error: String },
}

/// Status code plus body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifyResponse {
    /// HTTP-equivalent status code.
    pub status: u16,
    /// Response body.
    pub body: ResponseBody,
}

impl ClassifyResponse {
    fn success(predictions: Vec<PredictionResult>) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Predictions {
                predictions: predictions.into_iter().map(PredictionEntry::from).collect(),
            },
        }
    }

    fn failure(err: &ClassifyError) -> Self {
        Self {
            status: err.status_code(),
            body: ResponseBody::Error {
                error: err.public_message().to_string(),
            },
        }
    }

    /// Whether the request succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self.body, ResponseBody::Predictions { .. })
    }

    /// Serializes the body to JSON.
    pub fn body_json(&self) -> String {
        serde_json::to_string(&self.body)
            .unwrap_or_else(|_| r#"{"error":"Failed to process the image."}"#.to_string())
    }
}

/// Result of one request: the response plus the stages it passed through.
#[derive(Debug, Clone)]
pub struct HandlerOutcome {
    /// Response to send.
    pub response: ClassifyResponse,
    /// Visited stages, in order.
    pub stages: Vec<RequestStage>,
}

impl HandlerOutcome {
    /// Last stage reached.
    pub fn final_stage(&self) -> RequestStage {
        self.stages.last().copied().unwrap_or(RequestStage::Received)
    }
}

/// Body of the readiness query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    /// `ready`, `unloaded` or `failed`.
    pub status: &'static str,
    /// Whether classification requests can be served.
    pub ready: bool,
}

/// Validates uploads and drives them through the classifier.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    classifier: Arc<Classifier>,
}

impl RequestHandler {
    /// Creates a handler over a shared classifier.
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self { classifier }
    }

    /// Reports whether the model is ready.
    pub fn readiness(&self) -> ReadinessReport {
        let handle = self.classifier.handle();
        ReadinessReport {
            status: handle.state().as_str(),
            ready: handle.is_ready(),
        }
    }

    /// Handles one classification request.
    ///
    /// `upload` is `None` when the request had no file field.
    pub fn handle(&self, upload: Option<Upload>) -> HandlerOutcome {
        let mut stages = vec![RequestStage::Received];

        match self.run(upload, &mut stages) {
            Ok(predictions) => {
                stages.push(RequestStage::Responded);
                HandlerOutcome {
                    response: ClassifyResponse::success(predictions),
                    stages,
                }
            }
            Err(err) => {
                let failed_after = stages.last().copied().unwrap_or(RequestStage::Received);
                match err.class() {
                    ErrorClass::ClientFault => {
                        warn!("request rejected after {:?}: {}", failed_after, err.diagnostic())
                    }
                    ErrorClass::ServerFault => {
                        error!("request failed after {:?}: {}", failed_after, err.diagnostic())
                    }
                }
                stages.push(RequestStage::Errored);
                HandlerOutcome {
                    response: ClassifyResponse::failure(&err),
                    stages,
                }
            }
        }
    }

    fn run(
        &self,
        upload: Option<Upload>,
        stages: &mut Vec<RequestStage>,
    ) -> ClassifyResult<Vec<PredictionResult>> {
        let image = self.validate(upload)?;
        stages.push(RequestStage::Validated);

        let tensor = self.classifier.preprocess(&image.bytes)?;
        stages.push(RequestStage::Preprocessed);

        let scores = self.classifier.infer(&tensor)?;
        stages.push(RequestStage::Inferred);

        let predictions = self.classifier.interpret(&scores)?;
        stages.push(RequestStage::Interpreted);

        if let Some(top) = predictions.first() {
            debug!(
                "classified '{}' as '{}' ({:.4})",
                image.filename, top.class_name, top.confidence
            );
        }
        Ok(predictions)
    }

    /// Model readiness is checked before the upload is inspected.
    fn validate(&self, upload: Option<Upload>) -> ClassifyResult<UploadedImage> {
        self.classifier.handle().engine()?;

        let upload =
            upload.ok_or_else(|| ClassifyError::invalid_upload("no file part in the request"))?;
        if upload.filename.trim().is_empty() {
            return Err(ClassifyError::invalid_upload("no file selected for uploading"));
        }
        if upload.bytes.is_empty() {
            return Err(ClassifyError::invalid_upload(format!(
                "'{}' is empty",
                upload.filename
            )));
        }

        let sniffed_format = sniff_format(&upload.bytes);
        debug!(
            "upload '{}': {} bytes, declared {:?}, sniffed {:?}",
            upload.filename,
            upload.bytes.len(),
            upload.content_type,
            sniffed_format
        );

        Ok(UploadedImage {
            filename: upload.filename,
            declared_format: upload.content_type,
            sniffed_format,
            bytes: upload.bytes,
        })
    }
}
