//! Tensor aliases shared across the pipeline.

/// Input tensor in NHWC layout, `(1, H, W, 3)` for a single image.
pub type Tensor4D = ndarray::Array4<f32>;

/// Dense per-class scores, index-aligned with the class taxonomy.
pub type ScoreVector = Vec<f32>;
