//! Maps a score vector to ranked class predictions.
//!
//! Selection rules:
//! - the highest score wins; equal scores resolve to the lowest index
//! - NaN never outranks a number
//! - the confidence is the raw score; no softmax or other re-normalization is applied,
//!   because the model already emits probabilities

use crate::core::errors::{ClassifyError, ClassifyResult, SimpleError};
use crate::domain::{ClassTaxonomy, PredictionResult};
use std::cmp::Ordering;

/// Selects the single most likely class.
///
/// # Errors
///
/// Returns `ClassifyError::ShapeMismatch` if `scores.len() != taxonomy.len()`.
pub fn interpret(scores: &[f32], taxonomy: &ClassTaxonomy) -> ClassifyResult<PredictionResult> {
    check_lengths(scores, taxonomy)?;

    let mut best: Option<(usize, f32)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((index, score)),
        }
    }

    let (index, confidence) = best.ok_or_else(no_comparable_scores)?;
    Ok(to_prediction(taxonomy, index, confidence))
}

/// Returns the `k` most likely classes in descending score order.
///
/// `k` is clamped to the number of classes. Ties keep ascending index order.
///
/// # Errors
///
/// * `ClassifyError::ConfigError` if `k` is zero.
/// * `ClassifyError::ShapeMismatch` if `scores.len() != taxonomy.len()`.
pub fn interpret_top_k(
    scores: &[f32],
    taxonomy: &ClassTaxonomy,
    k: usize,
) -> ClassifyResult<Vec<PredictionResult>> {
    if k == 0 {
        return Err(ClassifyError::config_error("k must be greater than 0"));
    }
    check_lengths(scores, taxonomy)?;

    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| !score.is_nan())
        .collect();
    if ranked.is_empty() {
        return Err(no_comparable_scores());
    }

    // Stable sort keeps lower indices first among equal scores.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    Ok(ranked
        .into_iter()
        .take(k)
        .map(|(index, score)| to_prediction(taxonomy, index, score))
        .collect())
}

/// Interpreter bound to one taxonomy and a fixed `k`.
#[derive(Debug, Clone)]
pub struct Topk {
    taxonomy: ClassTaxonomy,
    k: usize,
}

impl Topk {
    /// Creates an interpreter returning the `k` best classes.
    pub fn new(taxonomy: ClassTaxonomy, k: usize) -> ClassifyResult<Self> {
        if k == 0 {
            return Err(ClassifyError::config_error("top_k must be greater than 0"));
        }
        Ok(Self { taxonomy, k })
    }

    /// The taxonomy predictions are drawn from.
    pub fn taxonomy(&self) -> &ClassTaxonomy {
        &self.taxonomy
    }

    /// Number of predictions returned per score vector.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Ranks `scores`.
    pub fn process(&self, scores: &[f32]) -> ClassifyResult<Vec<PredictionResult>> {
        interpret_top_k(scores, &self.taxonomy, self.k)
    }
}

fn check_lengths(scores: &[f32], taxonomy: &ClassTaxonomy) -> ClassifyResult<()> {
    if scores.len() != taxonomy.len() {
        return Err(ClassifyError::shape_mismatch(
            "score vector vs class taxonomy",
            taxonomy.len(),
            scores.len(),
        ));
    }
    Ok(())
}

fn to_prediction(taxonomy: &ClassTaxonomy, index: usize, confidence: f32) -> PredictionResult {
    if !(0.0..=1.0).contains(&confidence) {
        tracing::warn!(
            "score {} at index {} is outside [0, 1]; the model may be emitting logits",
            confidence,
            index
        );
    }
    // Lengths were checked, so the index is always in range.
    let name = taxonomy.name(index).unwrap_or_default();
    PredictionResult::new(index, name, confidence)
}

fn no_comparable_scores() -> ClassifyError {
    ClassifyError::inference(
        "interpreter",
        "score vector contains no comparable values",
        SimpleError::new("all scores are NaN"),
    )
}
