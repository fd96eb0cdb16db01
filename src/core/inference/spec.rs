//! Descriptors for a model's input and output tensors.

use crate::processors::PixelScale;
use std::fmt;

/// Marker for a dimension whose size is only known at run time.
pub const DYNAMIC_DIM: i64 = -1;

/// Element type of a model tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TensorDtype {
    /// 32-bit float.
    Float32,
    /// Any other element type, by name.
    Other(String),
}

impl fmt::Display for TensorDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorDtype::Float32 => write!(f, "f32"),
            TensorDtype::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Name, slot index, shape and element type of one model tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorSpec {
    /// Tensor name in the graph.
    pub name: String,
    /// Slot index among the model's inputs or outputs.
    pub index: usize,
    /// Declared shape; [`DYNAMIC_DIM`] marks dimensions resolved at run time.
    pub shape: Vec<i64>,
    /// Element type.
    pub dtype: TensorDtype,
}

impl TensorSpec {
    /// Whether a concrete shape satisfies this declaration.
    pub fn accepts_shape(&self, shape: &[usize]) -> bool {
        self.shape.len() == shape.len()
            && self
                .shape
                .iter()
                .zip(shape)
                .all(|(&declared, &actual)| declared < 0 || declared as usize == actual)
    }

    /// Size of the last dimension, when it is static.
    pub fn last_dim(&self) -> Option<usize> {
        self.shape
            .last()
            .copied()
            .filter(|&d| d >= 0)
            .map(|d| d as usize)
    }
}

/// The model's input contract: an NHWC image tensor plus the pixel scale it expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTensorSpec {
    /// Tensor descriptor.
    pub tensor: TensorSpec,
    /// Pixel value range the model was calibrated against.
    pub pixel_scale: PixelScale,
}

impl InputTensorSpec {
    /// Declared `(height, width)` where static.
    pub fn spatial_dims(&self) -> (Option<u32>, Option<u32>) {
        let dim = |i: usize| {
            self.tensor
                .shape
                .get(i)
                .copied()
                .filter(|&d| d >= 0)
                .map(|d| d as u32)
        };
        (dim(1), dim(2))
    }
}

/// The model's output contract: per-class scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTensorSpec {
    /// Tensor descriptor.
    pub tensor: TensorSpec,
}

impl OutputTensorSpec {
    /// Number of classes the model scores, when the shape declares it.
    pub fn num_classes(&self) -> Option<usize> {
        self.tensor.last_dim()
    }
}
