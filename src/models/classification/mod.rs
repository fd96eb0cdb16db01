//! Classification model loading.

pub mod loader;

pub use loader::{ModelHandle, ModelState};
