//! Image preparation and score interpretation.
//!
//! # Modules
//!
//! * `preprocess` - Decoding uploads into the model's input tensor
//! * `topk` - Mapping score vectors to ranked class predictions
//! * `types` - Pixel scale and resize filter types

pub mod preprocess;
pub mod topk;
pub mod types;

pub use preprocess::{ImagePreprocessor, prepare};
pub use topk::{Topk, interpret, interpret_top_k};
pub use types::{PixelScale, ResizeFilter};
