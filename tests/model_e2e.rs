//! Tests against a real model artifact.
//!
//! Ignored by default. Run with
//! `SKINSCAN_MODEL=models/model.onnx SKINSCAN_FIXTURE=fixtures/healthy.jpg cargo test -- --ignored`.

use skinscan::core::config::{ClassifierConfig, ModelConfig};
use skinscan::prelude::*;
use std::sync::Arc;

fn env_path(name: &str) -> std::path::PathBuf {
    std::env::var_os(name)
        .unwrap_or_else(|| panic!("{name} must be set for this test"))
        .into()
}

#[test]
#[ignore = "requires SKINSCAN_MODEL and SKINSCAN_FIXTURE"]
fn test_healthy_fixture_with_real_model() {
    let config = ClassifierConfig {
        model: ModelConfig {
            path: env_path("SKINSCAN_MODEL"),
            ..ModelConfig::default()
        },
        ..ClassifierConfig::default()
    };
    let classifier = Classifier::from_config(&config).unwrap();
    assert!(classifier.is_ready(), "{:?}", classifier.handle().state());

    let handler = RequestHandler::new(Arc::new(classifier));
    let bytes = std::fs::read(env_path("SKINSCAN_FIXTURE")).unwrap();
    let outcome = handler.handle(Some(Upload::new("healthy.jpg", bytes)));

    assert_eq!(outcome.response.status, 200);
    match outcome.response.body {
        ResponseBody::Predictions { predictions } => {
            assert_eq!(predictions[0].class, "Heathy");
            assert!(
                predictions[0].confidence >= 0.9,
                "confidence {}",
                predictions[0].confidence
            );
        }
        other => panic!("expected predictions, got {other:?}"),
    }
}

#[test]
#[ignore = "requires SKINSCAN_MODEL"]
fn test_real_model_descriptors_match_preprocessor() {
    let config = ClassifierConfig {
        model: ModelConfig {
            path: env_path("SKINSCAN_MODEL"),
            ..ModelConfig::default()
        },
        ..ClassifierConfig::default()
    };
    let classifier = Classifier::from_config(&config).unwrap();
    let input = classifier.handle().input_spec().unwrap();
    assert_eq!(input.spatial_dims(), (Some(128), Some(128)));
    let output = classifier.handle().output_spec().unwrap();
    assert_eq!(output.num_classes(), Some(classifier.taxonomy().len()));
}
