use super::*;
use crate::core::errors::SimpleError;
use ort::value::TensorRef;

impl OrtInfer {
    /// Binds `x` to the input slot, runs one forward pass and reads the output slot.
    pub(super) fn run(&self, x: &Tensor4D) -> Result<ScoreVector, ClassifyError> {
        self.validate_inference_input(x)?;
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifyError::inference(
                &self.model_name,
                &format!("failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input.tensor.name.as_str() => input_tensor];

        let idx = next_slot(&self.next_idx, self.sessions.len());
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            ClassifyError::inference(
                &self.model_name,
                &format!(
                    "failed to acquire session lock for session {}/{}",
                    idx,
                    self.sessions.len()
                ),
                SimpleError::new("session mutex poisoned by an earlier panic"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifyError::inference(
                &self.model_name,
                &format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    self.input.tensor.name, self.output.tensor.name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.output.tensor.name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifyError::inference(
                    &self.model_name,
                    &format!(
                        "failed to extract output tensor '{}' as f32",
                        self.output.tensor.name
                    ),
                    e,
                )
            })?;

        let scores = flatten_scores(&self.model_name, output_shape, output_data)?;
        tracing::debug!(
            "model '{}' produced {} scores for input {:?}",
            self.model_name,
            scores.len(),
            input_shape
        );
        Ok(scores)
    }
}

/// Turns a single-image classifier output into a dense score vector.
///
/// Accepts `[N]` or any shape whose leading dimensions are all 1 (typically `[1, N]`).
/// Non-finite scores are treated as an engine fault.
pub fn flatten_scores(
    model_name: &str,
    output_shape: &[i64],
    output_data: &[f32],
) -> Result<ScoreVector, ClassifyError> {
    let Some((&classes, leading)) = output_shape.split_last() else {
        return Err(ClassifyError::inference(
            model_name,
            "output tensor is a scalar",
            SimpleError::new("expected a [1, N] score tensor"),
        ));
    };

    if classes <= 0 || leading.iter().any(|&d| d != 1) {
        return Err(ClassifyError::inference(
            model_name,
            &format!("unexpected output shape {:?}", output_shape),
            SimpleError::new("expected a [1, N] score tensor for a single image"),
        ));
    }

    if output_data.len() != classes as usize {
        return Err(ClassifyError::inference(
            model_name,
            &format!(
                "output data size mismatch: shape {:?} but {} values",
                output_shape,
                output_data.len()
            ),
            SimpleError::new("output tensor data size mismatch"),
        ));
    }

    if let Some(position) = output_data.iter().position(|v| !v.is_finite()) {
        return Err(ClassifyError::inference(
            model_name,
            &format!("non-finite score at output position {position}"),
            SimpleError::new("numeric overflow in model output"),
        ));
    }

    Ok(output_data.to_vec())
}
