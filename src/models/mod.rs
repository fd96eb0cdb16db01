//! Model handles for the supported tasks.

pub mod classification;

pub use classification::{ModelHandle, ModelState};
