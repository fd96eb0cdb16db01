use super::*;
use crate::core::config::ModelConfig;
use crate::core::errors::SimpleError;
use crate::core::inference::session::{describe_value, load_session};
use crate::processors::PixelScale;
use std::path::Path;

impl OrtInfer {
    /// Loads the artifact named by `config` and discovers its tensor descriptors.
    ///
    /// Builds `config.pool_size()` sessions so concurrent requests do not queue on a
    /// single session lock. The input pixel scale comes from [`resolve_pixel_scale`].
    pub fn from_config(config: &ModelConfig) -> Result<Self, ClassifyError> {
        let path = config.path.as_path();
        let pool_size = config.pool_size();
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            sessions.push(load_session(path, config.ort_session.as_ref())?);
        }
        let session = &sessions[0];

        let input = session.inputs.get(config.input_index).ok_or_else(|| {
            ClassifyError::model_load(
                path,
                "input slot not found",
                SimpleError::new(format!(
                    "model has {} input(s), configured index is {}",
                    session.inputs.len(),
                    config.input_index
                )),
            )
        })?;
        let input_tensor = describe_value(&input.name, config.input_index, &input.input_type);

        let output = session.outputs.get(config.output_index).ok_or_else(|| {
            ClassifyError::model_load(
                path,
                "output slot not found",
                SimpleError::new(format!(
                    "model has {} output(s), configured index is {}",
                    session.outputs.len(),
                    config.output_index
                )),
            )
        })?;
        let output_tensor =
            describe_value(&output.name, config.output_index, &output.output_type);

        let declared = declared_pixel_scale(session, path);
        let pixel_scale = resolve_pixel_scale(path, declared.as_deref(), config.input_scale)?;

        Ok(OrtInfer {
            input: InputTensorSpec {
                tensor: input_tensor,
                pixel_scale,
            },
            output: OutputTensorSpec {
                tensor: output_tensor,
            },
            sessions: sessions.into_iter().map(Mutex::new).collect(),
            next_idx: AtomicUsize::new(0),
            model_path: path.to_path_buf(),
            model_name: config.display_name(),
        })
    }
}

/// Decides the input pixel scale of a model.
///
/// A scale declared in the artifact's metadata wins over the configured one. A declared
/// value that does not name a known scale is a `ModelLoad` error for the artifact at
/// `path`.
pub fn resolve_pixel_scale(
    path: &Path,
    declared: Option<&str>,
    configured: PixelScale,
) -> Result<PixelScale, ClassifyError> {
    match declared {
        Some(value) => {
            let scale = value.parse::<PixelScale>().map_err(|reason| {
                ClassifyError::model_load(
                    path,
                    "invalid pixel_scale metadata entry",
                    SimpleError::new(reason),
                )
            })?;
            if scale != configured {
                tracing::info!(
                    "model metadata declares {} pixel scale, overriding configured {}",
                    scale,
                    configured
                );
            }
            Ok(scale)
        }
        None => Ok(configured),
    }
}

/// Reads the raw `pixel_scale` entry from the artifact's custom metadata, if any.
fn declared_pixel_scale(session: &Session, path: &Path) -> Option<String> {
    let metadata = match session.metadata() {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::debug!("model metadata unavailable for {}: {}", path.display(), e);
            return None;
        }
    };

    match metadata.custom(PIXEL_SCALE_METADATA_KEY) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("failed to read pixel_scale metadata: {}", e);
            None
        }
    }
}
