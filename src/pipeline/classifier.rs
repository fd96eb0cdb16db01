//! The end-to-end classification pipeline.

use crate::core::config::ClassifierConfig;
use crate::core::errors::ClassifyResult;
use crate::core::tensor::{ScoreVector, Tensor4D};
use crate::domain::{ClassTaxonomy, PredictionResult};
use crate::models::ModelHandle;
use crate::processors::{ImagePreprocessor, Topk};

/// Owns the model handle, preprocessor and interpreter.
///
/// Build one at start-up, wrap it in an `Arc` and pass it to every request. Nothing in
/// it changes after construction, so concurrent requests share it without locking.
#[derive(Debug)]
pub struct Classifier {
    handle: ModelHandle,
    preprocessor: ImagePreprocessor,
    topk: Topk,
}

impl Classifier {
    /// Assembles a classifier from parts.
    ///
    /// The handle must have been validated against the same taxonomy and preprocessor.
    pub fn new(handle: ModelHandle, preprocessor: ImagePreprocessor, topk: Topk) -> Self {
        Self {
            handle,
            preprocessor,
            topk,
        }
    }

    /// Builds the classifier described by `config`, loading the model artifact.
    ///
    /// # Errors
    ///
    /// Returns an error only for invalid configuration (dimensions, `top_k`, taxonomy
    /// source). An artifact that cannot be loaded does not fail construction; it leaves
    /// the handle in the `Failed` state.
    pub fn from_config(config: &ClassifierConfig) -> ClassifyResult<Self> {
        let taxonomy = config.taxonomy.resolve()?;
        let preprocessor = ImagePreprocessor::from_config(&config.preprocess)?;
        let topk = Topk::new(taxonomy, config.top_k)?;
        let handle = ModelHandle::load(&config.model, topk.taxonomy(), &preprocessor);
        Ok(Self::new(handle, preprocessor, topk))
    }

    /// The model handle.
    pub fn handle(&self) -> &ModelHandle {
        &self.handle
    }

    /// The class taxonomy.
    pub fn taxonomy(&self) -> &ClassTaxonomy {
        self.topk.taxonomy()
    }

    /// The image preprocessor.
    pub fn preprocessor(&self) -> &ImagePreprocessor {
        &self.preprocessor
    }

    /// Number of ranked predictions returned per image.
    pub fn top_k(&self) -> usize {
        self.topk.k()
    }

    /// Whether the model is ready.
    pub fn is_ready(&self) -> bool {
        self.handle.is_ready()
    }

    /// Decodes and prepares raw upload bytes.
    pub fn preprocess(&self, raw_bytes: &[u8]) -> ClassifyResult<Tensor4D> {
        self.preprocessor.prepare(raw_bytes)
    }

    /// Runs one forward pass.
    pub fn infer(&self, tensor: &Tensor4D) -> ClassifyResult<ScoreVector> {
        self.handle.infer(tensor)
    }

    /// Ranks a score vector against the taxonomy.
    pub fn interpret(&self, scores: &[f32]) -> ClassifyResult<Vec<PredictionResult>> {
        self.topk.process(scores)
    }
}
