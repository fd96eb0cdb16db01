//! Prediction result type.

use super::taxonomy::class_slug;
use serde::Serialize;

/// A single ranked class prediction.
///
/// `confidence` is the model's raw score at `index`; no re-normalization is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Class name from the taxonomy.
    pub class_name: String,
    /// Stable slug of the class name.
    pub class_id: String,
    /// Position of the class in the taxonomy and score vector.
    pub index: usize,
    /// Score the model assigned to the class.
    pub confidence: f32,
}

impl PredictionResult {
    /// Creates a prediction for the class at `index`.
    pub fn new(index: usize, class_name: impl Into<String>, confidence: f32) -> Self {
        let class_name = class_name.into();
        Self {
            class_id: class_slug(&class_name),
            class_name,
            index,
            confidence,
        }
    }
}
