//! Classification pipeline and its request boundary.
//!
//! * [`classifier`] - Owns the model handle and runs bytes → ranked predictions
//! * [`handler`] - Validates uploads and renders responses for the transport layer

pub mod classifier;
pub mod handler;

pub use classifier::Classifier;
pub use handler::{
    ClassifyResponse, HandlerOutcome, PredictionEntry, ReadinessReport, RequestHandler,
    RequestStage, ResponseBody, Upload, UploadedImage,
};
