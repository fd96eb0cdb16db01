//! Start-up configuration for the classifier.
//!
//! Configuration is read once from a JSON file. Every field has a default, so a
//! file only needs to name what differs:
//!
//! ```json
//! {
//!   "model": { "path": "models/skin.onnx" },
//!   "preprocess": { "height": 128, "width": 128 },
//!   "top_k": 3
//! }
//! ```

use super::errors::{ConfigError, ConfigValidator};
use super::onnx::OrtSessionConfig;
use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::domain::ClassTaxonomy;
use crate::processors::{PixelScale, ResizeFilter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the model artifact.
pub const DEFAULT_MODEL_PATH: &str = "models/model.onnx";
/// Default model input height.
pub const DEFAULT_INPUT_HEIGHT: u32 = 128;
/// Default model input width.
pub const DEFAULT_INPUT_WIDTH: u32 = 128;
/// Default upper bound on either side of an uploaded image, in pixels.
pub const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 10_000;

/// Where the model artifact lives and how to bind to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model artifact.
    pub path: PathBuf,
    /// Display name; defaults to the file stem.
    pub name: Option<String>,
    /// Input scale the model was calibrated against. Overridden by the artifact's
    /// `pixel_scale` metadata entry when present.
    pub input_scale: PixelScale,
    /// Index of the input slot to bind.
    pub input_index: usize,
    /// Index of the output slot to read.
    pub output_index: usize,
    /// ONNX Runtime session options.
    pub ort_session: Option<OrtSessionConfig>,
    /// Number of sessions to create for concurrent requests (default 1).
    pub session_pool_size: Option<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            name: None,
            input_scale: PixelScale::Raw,
            input_index: 0,
            output_index: 0,
            ort_session: None,
            session_pool_size: None,
        }
    }
}

impl ModelConfig {
    /// Name used in logs and errors.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown_model")
                .to_string()
        })
    }

    /// Number of ONNX Runtime sessions to build.
    pub fn pool_size(&self) -> usize {
        self.session_pool_size.unwrap_or(1).max(1)
    }
}

/// How uploads are turned into input tensors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Target height in pixels.
    pub height: u32,
    /// Target width in pixels.
    pub width: u32,
    /// Resampling filter.
    pub resize_filter: ResizeFilter,
    /// Scale applied to pixel values.
    pub pixel_scale: PixelScale,
    /// Largest accepted width or height of a decoded upload.
    pub max_image_dimension: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_INPUT_HEIGHT,
            width: DEFAULT_INPUT_WIDTH,
            resize_filter: ResizeFilter::default(),
            pixel_scale: PixelScale::Raw,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
        }
    }
}

/// Source of the ordered class names.
///
/// At most one of `labels` and `labels_path` may be set; with neither, the built-in
/// skin-condition taxonomy is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Inline class names, index-aligned with the model output.
    pub labels: Option<Vec<String>>,
    /// Metadata file of the form `{"labels": [...]}`.
    pub labels_path: Option<PathBuf>,
}

impl TaxonomyConfig {
    /// Builds the taxonomy this configuration describes.
    pub fn resolve(&self) -> ClassifyResult<ClassTaxonomy> {
        match (&self.labels, &self.labels_path) {
            (Some(_), Some(_)) => Err(ClassifyError::config_error(
                "taxonomy.labels and taxonomy.labels_path are mutually exclusive",
            )),
            (Some(labels), None) => ClassTaxonomy::new(labels.clone()),
            (None, Some(path)) => ClassTaxonomy::from_metadata_file(path),
            (None, None) => Ok(ClassTaxonomy::skin_conditions()),
        }
    }
}

/// Complete classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Model artifact settings.
    pub model: ModelConfig,
    /// Preprocessing settings.
    pub preprocess: PreprocessConfig,
    /// Class taxonomy source.
    pub taxonomy: TaxonomyConfig,
    /// Number of ranked predictions returned per request.
    pub top_k: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            preprocess: PreprocessConfig::default(),
            taxonomy: TaxonomyConfig::default(),
            top_k: 1,
        }
    }
}

impl ClassifierConfig {
    /// Reads and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ClassifyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifyError::config_error(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Parses and validates a configuration document.
    pub fn from_json_str(content: &str) -> ClassifyResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

impl ConfigValidator for ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_image_dimensions(self.preprocess.height, self.preprocess.width)?;

        if self.preprocess.max_image_dimension == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "preprocess.max_image_dimension must be greater than 0".to_string(),
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidConfig {
                message: "top_k must be greater than 0".to_string(),
            });
        }

        if self.taxonomy.labels.is_some() && self.taxonomy.labels_path.is_some() {
            return Err(ConfigError::InvalidConfig {
                message: "taxonomy.labels and taxonomy.labels_path are mutually exclusive"
                    .to_string(),
            });
        }

        if self.model.session_pool_size == Some(0) {
            return Err(ConfigError::InvalidConfig {
                message: "model.session_pool_size must be greater than 0".to_string(),
            });
        }

        if let Some(ort) = &self.model.ort_session {
            if ort.intra_threads == Some(0) || ort.inter_threads == Some(0) {
                return Err(ConfigError::InvalidConfig {
                    message: "ONNX Runtime thread counts must be greater than 0".to_string(),
                });
            }
        }

        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_calibrated_contract() {
        let config = ClassifierConfig::default();
        assert_eq!(config.preprocess.height, 128);
        assert_eq!(config.preprocess.width, 128);
        assert_eq!(config.preprocess.pixel_scale, PixelScale::Raw);
        assert_eq!(config.model.input_scale, PixelScale::Raw);
        assert_eq!(config.top_k, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = ClassifierConfig::from_json_str(
            r#"{"model": {"path": "m/skin.onnx"}, "top_k": 3}"#,
        )
        .unwrap();
        assert_eq!(config.model.path, PathBuf::from("m/skin.onnx"));
        assert_eq!(config.model.display_name(), "skin");
        assert_eq!(config.top_k, 3);
        assert_eq!(config.preprocess, PreprocessConfig::default());
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let result = ClassifierConfig::from_json_str(r#"{"preprocess": {"height": 0}}"#);
        assert!(matches!(result, Err(ClassifyError::ConfigError { .. })));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let result = ClassifierConfig::from_json_str(r#"{"top_k": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_conflicting_taxonomy_sources_rejected() {
        let result = ClassifierConfig::from_json_str(
            r#"{"taxonomy": {"labels": ["a"], "labels_path": "labels.json"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_scale_is_a_parse_error() {
        let result = ClassifierConfig::from_json_str(r#"{"model": {"input_scale": "zscore"}}"#);
        assert!(matches!(result, Err(ClassifyError::ConfigError { .. })));
    }

    #[test]
    fn test_taxonomy_resolution_defaults_to_builtin() {
        let taxonomy = TaxonomyConfig::default().resolve().unwrap();
        assert_eq!(taxonomy.len(), 25);
    }

    #[test]
    fn test_session_pool_size() {
        assert_eq!(ModelConfig::default().pool_size(), 1);

        let config =
            ClassifierConfig::from_json_str(r#"{"model": {"session_pool_size": 4}}"#).unwrap();
        assert_eq!(config.model.pool_size(), 4);

        let result = ClassifierConfig::from_json_str(r#"{"model": {"session_pool_size": 0}}"#);
        assert!(matches!(result, Err(ClassifyError::ConfigError { .. })));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = ClassifierConfig::from_json_file("does/not/exist.json");
        assert!(matches!(result, Err(ClassifyError::ConfigError { .. })));
    }
}
