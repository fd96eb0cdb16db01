//! Domain types: the class taxonomy and prediction results.

pub mod prediction;
pub mod taxonomy;

pub use prediction::PredictionResult;
pub use taxonomy::{ClassTaxonomy, class_slug};
