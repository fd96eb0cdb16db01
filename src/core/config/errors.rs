//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An image dimension is zero or otherwise unusable.
    #[error("invalid image dimensions: {height}x{width}")]
    InvalidDimensions { height: u32, width: u32 },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A trait for validating configuration parameters.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that both image dimensions are non-zero.
    fn validate_image_dimensions(&self, height: u32, width: u32) -> Result<(), ConfigError> {
        if height == 0 || width == 0 {
            return Err(ConfigError::InvalidDimensions { height, width });
        }
        Ok(())
    }
}
