//! Turns uploaded image bytes into the classifier's input tensor.
//!
//! The steps run in a fixed order: decode, convert to RGB (alpha dropped), resize to
//! the model resolution, convert to `f32` at the configured [`PixelScale`], add the
//! batch dimension. The result is always `(1, H, W, 3)` in NHWC layout, or an error;
//! a partially prepared tensor is never returned.

use crate::core::config::PreprocessConfig;
use crate::core::config::classifier::DEFAULT_MAX_IMAGE_DIMENSION;
use crate::core::errors::{ClassifyError, ClassifyResult, ProcessingStage, SimpleError};
use crate::core::tensor::Tensor4D;
use crate::processors::types::{PixelScale, ResizeFilter};
use crate::utils::{decode_image, dynamic_to_rgb};
use image::{DynamicImage, RgbImage, imageops};
use ndarray::Array4;

/// Number of colour channels in the prepared tensor.
pub const CHANNELS: usize = 3;

/// Prepares images for a model with a fixed `(H, W)` input.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePreprocessor {
    height: u32,
    width: u32,
    resize_filter: ResizeFilter,
    pixel_scale: PixelScale,
    max_image_dimension: u32,
}

impl ImagePreprocessor {
    /// Creates a preprocessor with raw pixel scale and the default resize filter.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either dimension is zero.
    pub fn new(height: u32, width: u32) -> ClassifyResult<Self> {
        if height == 0 || width == 0 {
            return Err(ClassifyError::config_error(format!(
                "target size must be non-zero, got {height}x{width}"
            )));
        }
        Ok(Self {
            height,
            width,
            resize_filter: ResizeFilter::default(),
            pixel_scale: PixelScale::Raw,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
        })
    }

    /// Creates a preprocessor from configuration.
    pub fn from_config(config: &PreprocessConfig) -> ClassifyResult<Self> {
        Ok(Self::new(config.height, config.width)?
            .with_resize_filter(config.resize_filter)
            .with_pixel_scale(config.pixel_scale)
            .with_max_image_dimension(config.max_image_dimension))
    }

    /// Sets the resampling filter.
    pub fn with_resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Sets the pixel scale.
    pub fn with_pixel_scale(mut self, scale: PixelScale) -> Self {
        self.pixel_scale = scale;
        self
    }

    /// Sets the largest accepted width or height of a decoded upload.
    pub fn with_max_image_dimension(mut self, max: u32) -> Self {
        self.max_image_dimension = max;
        self
    }

    /// Target `(height, width)`.
    pub fn target_size(&self) -> (u32, u32) {
        (self.height, self.width)
    }

    /// Pixel scale of the tensors this preprocessor produces.
    pub fn pixel_scale(&self) -> PixelScale {
        self.pixel_scale
    }

    /// Shape of every tensor this preprocessor produces.
    pub fn output_shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, CHANNELS]
    }

    /// Decodes `raw_bytes` and prepares the input tensor.
    ///
    /// # Errors
    ///
    /// * `ClassifyError::Decode` if the bytes are not a supported image.
    /// * `ClassifyError::Preprocess` if a later step fails.
    pub fn prepare(&self, raw_bytes: &[u8]) -> ClassifyResult<Tensor4D> {
        let decoded = decode_image(raw_bytes, self.max_image_dimension)?;
        self.prepare_image(decoded)
    }

    /// Prepares an already decoded image.
    pub fn prepare_image(&self, image: DynamicImage) -> ClassifyResult<Tensor4D> {
        let rgb = dynamic_to_rgb(image);
        if rgb.width() == 0 || rgb.height() == 0 {
            return Err(ClassifyError::preprocess(
                ProcessingStage::ColorConversion,
                "decoded image has no pixels",
                SimpleError::new(format!("{}x{}", rgb.width(), rgb.height())),
            ));
        }

        let resized = self.resize(rgb)?;
        let tensor = self.to_tensor(&resized)?;
        tracing::debug!(
            "prepared tensor {:?} ({} scale)",
            tensor.shape(),
            self.pixel_scale
        );
        Ok(tensor)
    }

    fn resize(&self, rgb: RgbImage) -> ClassifyResult<RgbImage> {
        if rgb.dimensions() == (self.width, self.height) {
            return Ok(rgb);
        }

        let resized = imageops::resize(&rgb, self.width, self.height, self.resize_filter.into());
        if resized.dimensions() != (self.width, self.height) {
            return Err(ClassifyError::preprocess(
                ProcessingStage::Resize,
                "resize produced unexpected dimensions",
                SimpleError::new(format!(
                    "expected {}x{}, got {}x{}",
                    self.width,
                    self.height,
                    resized.width(),
                    resized.height()
                )),
            ));
        }
        Ok(resized)
    }

    /// Converts HWC `u8` pixels to a `(1, H, W, 3)` `f32` tensor.
    fn to_tensor(&self, rgb: &RgbImage) -> ClassifyResult<Tensor4D> {
        let factor = self.pixel_scale.factor();
        let data: Vec<f32> = rgb.as_raw().iter().map(|&v| f32::from(v) * factor).collect();

        Array4::from_shape_vec(self.output_shape(), data).map_err(|e| {
            ClassifyError::preprocess(
                ProcessingStage::TensorConversion,
                "pixel buffer does not match the target shape",
                e,
            )
        })
    }
}

/// Prepares `raw_bytes` for a `(target_height, target_width)` model input with the
/// default resize filter and raw pixel scale.
pub fn prepare(raw_bytes: &[u8], target_height: u32, target_width: u32) -> ClassifyResult<Tensor4D> {
    ImagePreprocessor::new(target_height, target_width)?.prepare(raw_bytes)
}
