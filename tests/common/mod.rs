//! Shared helpers for integration tests.
#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use skinscan::core::errors::SimpleError;
use skinscan::core::inference::{
    DYNAMIC_DIM, InputTensorSpec, OutputTensorSpec, TensorDtype, TensorSpec,
};
use skinscan::core::{ClassifyError, InferenceEngine, ScoreVector, Tensor4D};
use skinscan::domain::ClassTaxonomy;
use skinscan::models::ModelHandle;
use skinscan::pipeline::{Classifier, RequestHandler};
use skinscan::processors::{ImagePreprocessor, PixelScale, Topk};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

/// Index of the healthy-skin class in the built-in taxonomy.
pub const HEALTHY_INDEX: usize = 11;

/// Engine returning a fixed score vector and recording what it was fed.
#[derive(Debug)]
pub struct ScriptedEngine {
    input: InputTensorSpec,
    output: OutputTensorSpec,
    scores: Result<Vec<f32>, String>,
    last_input_max: InputRecorder,
}

/// Largest pixel value of the last tensor an engine was fed.
pub type InputRecorder = Arc<Mutex<Option<f32>>>;

impl ScriptedEngine {
    pub fn new(height: i64, width: i64, scores: Vec<f32>) -> Self {
        let classes = scores.len() as i64;
        Self {
            input: InputTensorSpec {
                tensor: TensorSpec {
                    name: "input_1".to_string(),
                    index: 0,
                    shape: vec![DYNAMIC_DIM, height, width, 3],
                    dtype: TensorDtype::Float32,
                },
                pixel_scale: PixelScale::Raw,
            },
            output: OutputTensorSpec {
                tensor: TensorSpec {
                    name: "dense".to_string(),
                    index: 0,
                    shape: vec![1, classes],
                    dtype: TensorDtype::Float32,
                },
            },
            scores: Ok(scores),
            last_input_max: Arc::new(Mutex::new(None)),
        }
    }

    /// An engine whose output class dimension is dynamic.
    pub fn with_dynamic_classes(mut self) -> Self {
        self.output.tensor.shape = vec![1, DYNAMIC_DIM];
        self
    }

    /// An engine that faults on every forward pass.
    pub fn failing(height: i64, width: i64, classes: usize, message: &str) -> Self {
        let mut engine = Self::new(height, width, vec![0.0; classes]);
        engine.scores = Err(message.to_string());
        engine
    }

    /// Shared view of the inputs this engine sees, usable after it is boxed.
    pub fn recorder(&self) -> InputRecorder {
        Arc::clone(&self.last_input_max)
    }
}

impl InferenceEngine for ScriptedEngine {
    fn input_spec(&self) -> &InputTensorSpec {
        &self.input
    }

    fn output_spec(&self) -> &OutputTensorSpec {
        &self.output
    }

    fn infer(&self, input: &Tensor4D) -> Result<ScoreVector, ClassifyError> {
        let max = input.iter().copied().fold(f32::MIN, f32::max);
        if let Ok(mut guard) = self.last_input_max.lock() {
            *guard = Some(max);
        }
        self.scores.clone().map_err(|msg| {
            ClassifyError::inference("scripted", "forward pass", SimpleError::new(msg))
        })
    }

    fn engine_info(&self) -> String {
        "scripted".to_string()
    }
}

/// Scores for the built-in taxonomy with `value` at `index` and a small remainder
/// spread over the other classes.
pub fn peaked_scores(index: usize, value: f32) -> Vec<f32> {
    let classes = ClassTaxonomy::skin_conditions().len();
    let rest = (1.0 - value) / (classes - 1) as f32;
    (0..classes)
        .map(|i| if i == index { value } else { rest })
        .collect()
}

/// A handler over the built-in taxonomy and a scripted engine.
pub fn handler_with(engine: ScriptedEngine, size: u32, top_k: usize) -> RequestHandler {
    let taxonomy = ClassTaxonomy::skin_conditions();
    let preprocessor = ImagePreprocessor::new(size, size).unwrap();
    let handle = ModelHandle::from_engine(Box::new(engine), &taxonomy, &preprocessor);
    let topk = Topk::new(taxonomy, top_k).unwrap();
    RequestHandler::new(Arc::new(Classifier::new(handle, preprocessor, topk)))
}

fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
    bytes
}

/// A solid-colour PNG.
pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb))),
        ImageFormat::Png,
    )
}

/// A skin-toned JPEG with a gradient, standing in for a photograph.
pub fn skin_jpeg(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            200u8.saturating_add((x % 40) as u8),
            150u8.saturating_add((y % 40) as u8),
            120,
        ])
    });
    encode(DynamicImage::ImageRgb8(image), ImageFormat::Jpeg)
}

/// A semi-transparent PNG.
pub fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    encode(
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 128]))),
        ImageFormat::Png,
    )
}
