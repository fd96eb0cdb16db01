//! Model loading and readiness tracking.
//!
//! A [`ModelHandle`] is built once at start-up and then only read. Loading never
//! panics: a missing or incompatible artifact yields a handle in the `Failed` state so
//! the service can still start and report its readiness honestly.

use crate::core::config::ModelConfig;
use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::inference::{InputTensorSpec, OrtInfer, OutputTensorSpec, TensorDtype};
use crate::core::tensor::{ScoreVector, Tensor4D};
use crate::core::traits::InferenceEngine;
use crate::domain::ClassTaxonomy;
use crate::processors::ImagePreprocessor;
use crate::processors::preprocess::CHANNELS;
use tracing::{debug, error, info};

/// Readiness of a model handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelState {
    /// No load has been attempted.
    Unloaded,
    /// The artifact loaded and passed validation.
    Ready,
    /// Loading or validation failed; holds the diagnostic.
    Failed(String),
}

impl ModelState {
    /// Short lower-case name for status reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelState::Unloaded => "unloaded",
            ModelState::Ready => "ready",
            ModelState::Failed(_) => "failed",
        }
    }
}

/// The process-wide classifier model and its readiness.
pub struct ModelHandle {
    state: ModelState,
    engine: Option<Box<dyn InferenceEngine>>,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("state", &self.state)
            .field("engine", &self.engine.as_ref().map(|e| e.engine_info()))
            .finish()
    }
}

impl ModelHandle {
    /// A handle on which no load has been attempted.
    pub fn unloaded() -> Self {
        Self {
            state: ModelState::Unloaded,
            engine: None,
        }
    }

    /// Loads the ONNX artifact described by `config` and validates it against the
    /// taxonomy and preprocessor it will be used with.
    pub fn load(
        config: &ModelConfig,
        taxonomy: &ClassTaxonomy,
        preprocessor: &ImagePreprocessor,
    ) -> Self {
        match OrtInfer::from_config(config) {
            Ok(engine) => Self::from_engine(Box::new(engine), taxonomy, preprocessor),
            Err(err) => Self::failed(err),
        }
    }

    /// Wraps an already constructed engine, applying the same validation as [`load`].
    ///
    /// [`load`]: ModelHandle::load
    pub fn from_engine(
        engine: Box<dyn InferenceEngine>,
        taxonomy: &ClassTaxonomy,
        preprocessor: &ImagePreprocessor,
    ) -> Self {
        if let Err(err) = validate_engine(engine.as_ref(), taxonomy, preprocessor) {
            return Self::failed(err);
        }

        info!(
            "model ready: {} (input {:?}, output {:?}, {} classes)",
            engine.engine_info(),
            engine.input_spec().tensor.shape,
            engine.output_spec().tensor.shape,
            taxonomy.len()
        );
        Self {
            state: ModelState::Ready,
            engine: Some(engine),
        }
    }

    fn failed(err: ClassifyError) -> Self {
        let diagnostic = err.diagnostic();
        error!("model failed to load: {}", diagnostic);
        Self {
            state: ModelState::Failed(diagnostic),
            engine: None,
        }
    }

    /// Current readiness state.
    pub fn state(&self) -> &ModelState {
        &self.state
    }

    /// Whether the model can serve inference requests.
    pub fn is_ready(&self) -> bool {
        self.state == ModelState::Ready
    }

    /// The engine, if the handle is ready.
    pub fn engine(&self) -> ClassifyResult<&dyn InferenceEngine> {
        match (&self.state, &self.engine) {
            (ModelState::Ready, Some(engine)) => Ok(engine.as_ref()),
            (ModelState::Failed(reason), _) => Err(ClassifyError::model_not_ready(reason.clone())),
            _ => Err(ClassifyError::model_not_ready(self.state.as_str())),
        }
    }

    /// Input tensor descriptor of a ready model.
    pub fn input_spec(&self) -> Option<&InputTensorSpec> {
        self.engine.as_ref().map(|e| e.input_spec())
    }

    /// Output tensor descriptor of a ready model.
    pub fn output_spec(&self) -> Option<&OutputTensorSpec> {
        self.engine.as_ref().map(|e| e.output_spec())
    }

    /// Runs one forward pass.
    ///
    /// # Errors
    ///
    /// * `ModelNotReady` if the handle is not `Ready`.
    /// * `ShapeMismatch` if `tensor` does not match the input descriptor, or the engine
    ///   returns a vector whose length disagrees with the output descriptor.
    /// * `Inference` if the engine faults.
    pub fn infer(&self, tensor: &Tensor4D) -> ClassifyResult<ScoreVector> {
        let engine = self.engine()?;
        engine.validate_inference_input(tensor)?;

        let scores = engine.infer(tensor)?;
        if let Some(expected) = engine.output_spec().num_classes() {
            if scores.len() != expected {
                return Err(ClassifyError::shape_mismatch(
                    "model output",
                    expected,
                    scores.len(),
                ));
            }
        }
        Ok(scores)
    }
}

/// Checks an engine's tensor contract against the taxonomy and preprocessor.
fn validate_engine(
    engine: &dyn InferenceEngine,
    taxonomy: &ClassTaxonomy,
    preprocessor: &ImagePreprocessor,
) -> ClassifyResult<()> {
    let input = engine.input_spec();
    let output = engine.output_spec();

    if input.tensor.dtype != TensorDtype::Float32 {
        return Err(ClassifyError::config_error(format!(
            "model input '{}' has element type {}, expected f32",
            input.tensor.name, input.tensor.dtype
        )));
    }
    if output.tensor.dtype != TensorDtype::Float32 {
        return Err(ClassifyError::config_error(format!(
            "model output '{}' has element type {}, expected f32",
            output.tensor.name, output.tensor.dtype
        )));
    }

    let prepared = preprocessor.output_shape();
    if !input.tensor.accepts_shape(&prepared) {
        return Err(ClassifyError::shape_mismatch(
            "model input vs preprocessor output",
            format!("{:?}", input.tensor.shape),
            format!("{:?} (1, H, W, {})", prepared, CHANNELS),
        ));
    }

    if input.pixel_scale != preprocessor.pixel_scale() {
        return Err(ClassifyError::config_error(format!(
            "model expects {} pixel scale but the preprocessor produces {}",
            input.pixel_scale,
            preprocessor.pixel_scale()
        )));
    }

    match output.num_classes() {
        Some(classes) if classes != taxonomy.len() => {
            return Err(ClassifyError::shape_mismatch(
                "model output vs class taxonomy",
                taxonomy.len(),
                classes,
            ));
        }
        Some(_) => {}
        None => {
            debug!(
                "model output '{}' has a dynamic class dimension; running a warm-up pass",
                output.tensor.name
            );
            let warm_up = Tensor4D::zeros(preprocessor.output_shape());
            let scores = engine.infer(&warm_up)?;
            if scores.len() != taxonomy.len() {
                return Err(ClassifyError::shape_mismatch(
                    "model output vs class taxonomy",
                    taxonomy.len(),
                    scores.len(),
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::SimpleError;
    use crate::core::inference::{DYNAMIC_DIM, TensorSpec};
    use crate::processors::PixelScale;

    #[derive(Debug)]
    struct FixedEngine {
        input: InputTensorSpec,
        output: OutputTensorSpec,
        scores: Result<Vec<f32>, String>,
    }

    impl FixedEngine {
        fn new(input_shape: Vec<i64>, classes: i64, scores: Vec<f32>) -> Self {
            Self {
                input: InputTensorSpec {
                    tensor: TensorSpec {
                        name: "input".to_string(),
                        index: 0,
                        shape: input_shape,
                        dtype: TensorDtype::Float32,
                    },
                    pixel_scale: PixelScale::Raw,
                },
                output: OutputTensorSpec {
                    tensor: TensorSpec {
                        name: "scores".to_string(),
                        index: 0,
                        shape: vec![1, classes],
                        dtype: TensorDtype::Float32,
                    },
                },
                scores: Ok(scores),
            }
        }
    }

    impl InferenceEngine for FixedEngine {
        fn input_spec(&self) -> &InputTensorSpec {
            &self.input
        }

        fn output_spec(&self) -> &OutputTensorSpec {
            &self.output
        }

        fn infer(&self, _input: &Tensor4D) -> Result<ScoreVector, ClassifyError> {
            self.scores
                .clone()
                .map_err(|msg| ClassifyError::inference("fixed", "scripted failure", SimpleError::new(msg)))
        }

        fn engine_info(&self) -> String {
            "fixed".to_string()
        }
    }

    fn setup() -> (ClassTaxonomy, ImagePreprocessor) {
        (
            ClassTaxonomy::new(["a", "b", "c"]).unwrap(),
            ImagePreprocessor::new(4, 4).unwrap(),
        )
    }

    #[test]
    fn test_unloaded_is_not_ready() {
        let handle = ModelHandle::unloaded();
        assert_eq!(handle.state(), &ModelState::Unloaded);
        assert!(matches!(
            handle.infer(&Tensor4D::zeros((1, 4, 4, 3))),
            Err(ClassifyError::ModelNotReady { .. })
        ));
    }

    #[test]
    fn test_load_missing_artifact_fails_without_panicking() {
        let (taxonomy, preprocessor) = setup();
        let config = ModelConfig {
            path: "missing/model.onnx".into(),
            ..ModelConfig::default()
        };
        let handle = ModelHandle::load(&config, &taxonomy, &preprocessor);
        assert!(matches!(handle.state(), ModelState::Failed(_)));
        assert!(!handle.is_ready());
        assert!(handle.input_spec().is_none());
    }

    #[test]
    fn test_ready_engine() {
        let (taxonomy, preprocessor) = setup();
        let engine = FixedEngine::new(vec![DYNAMIC_DIM, 4, 4, 3], 3, vec![0.2, 0.5, 0.3]);
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        assert!(handle.is_ready());

        let scores = handle.infer(&Tensor4D::zeros((1, 4, 4, 3))).unwrap();
        assert_eq!(scores, vec![0.2, 0.5, 0.3]);
    }

    #[test]
    fn test_taxonomy_length_mismatch_fails_at_load() {
        let (taxonomy, preprocessor) = setup();
        let engine = FixedEngine::new(vec![1, 4, 4, 3], 25, vec![0.0; 25]);
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        match handle.state() {
            ModelState::Failed(reason) => assert!(reason.contains("taxonomy")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_input_size_mismatch_fails_at_load() {
        let (taxonomy, preprocessor) = setup();
        let engine = FixedEngine::new(vec![1, 224, 224, 3], 3, vec![0.0; 3]);
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        assert!(!handle.is_ready());
    }

    #[test]
    fn test_channels_first_input_fails_at_load() {
        let (taxonomy, preprocessor) = setup();
        let engine = FixedEngine::new(vec![1, 3, 4, 4], 3, vec![0.0; 3]);
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        assert!(!handle.is_ready());
    }

    #[test]
    fn test_pixel_scale_mismatch_fails_at_load() {
        let (taxonomy, preprocessor) = setup();
        let preprocessor = preprocessor.with_pixel_scale(PixelScale::UnitInterval);
        let engine = FixedEngine::new(vec![1, 4, 4, 3], 3, vec![0.0; 3]);
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        match handle.state() {
            ModelState::Failed(reason) => assert!(reason.contains("pixel scale")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_non_float_input_fails_at_load() {
        let (taxonomy, preprocessor) = setup();
        let mut engine = FixedEngine::new(vec![1, 4, 4, 3], 3, vec![0.0; 3]);
        engine.input.tensor.dtype = TensorDtype::Other("Uint8".to_string());
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        assert!(!handle.is_ready());
    }

    #[test]
    fn test_wrong_tensor_shape_rejected_before_engine() {
        let (taxonomy, preprocessor) = setup();
        let engine = FixedEngine::new(vec![1, 4, 4, 3], 3, vec![0.1, 0.2, 0.7]);
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        assert!(matches!(
            handle.infer(&Tensor4D::zeros((1, 8, 8, 3))),
            Err(ClassifyError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_engine_fault_is_inference_error() {
        let (taxonomy, preprocessor) = setup();
        let mut engine = FixedEngine::new(vec![1, 4, 4, 3], 3, vec![]);
        engine.scores = Err("overflow".to_string());
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        assert!(matches!(
            handle.infer(&Tensor4D::zeros((1, 4, 4, 3))),
            Err(ClassifyError::Inference { .. })
        ));
    }

    #[test]
    fn test_short_output_is_shape_mismatch() {
        let (taxonomy, preprocessor) = setup();
        let engine = FixedEngine::new(vec![1, 4, 4, 3], 3, vec![0.5, 0.5]);
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        assert!(matches!(
            handle.infer(&Tensor4D::zeros((1, 4, 4, 3))),
            Err(ClassifyError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_dynamic_class_dim_checked_by_warm_up() {
        let (taxonomy, preprocessor) = setup();

        let mut engine = FixedEngine::new(vec![1, 4, 4, 3], 3, vec![0.1, 0.6, 0.3]);
        engine.output.tensor.shape = vec![1, DYNAMIC_DIM];
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        assert!(handle.is_ready());

        let mut engine = FixedEngine::new(vec![1, 4, 4, 3], 3, vec![0.5; 7]);
        engine.output.tensor.shape = vec![1, DYNAMIC_DIM];
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        match handle.state() {
            ModelState::Failed(reason) => assert!(reason.contains("taxonomy")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_warm_up_fault_fails_at_load() {
        let (taxonomy, preprocessor) = setup();
        let mut engine = FixedEngine::new(vec![1, 4, 4, 3], 3, vec![]);
        engine.output.tensor.shape = vec![1, DYNAMIC_DIM];
        engine.scores = Err("device lost".to_string());
        let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
        match handle.state() {
            ModelState::Failed(reason) => assert!(reason.contains("device lost")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
