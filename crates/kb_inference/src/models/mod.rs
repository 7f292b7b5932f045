use std::sync::Arc;

use kb_core::{ClassificationResult, Error, InferenceModel, RelevanceLabel, Result};
use tracing::info;

use crate::checkpoint::{download_client, CheckpointFetcher, DEFAULT_CONNECT_TIMEOUT};
use crate::{Config, ModelConfig};

pub mod dummy;
pub mod remote;

pub use dummy::DummyModel;
pub use remote::{RemoteModel, RemoteModelConfig};

/// Builds the configured model. For the remote model this waits for the
/// service, then fetches and loads the fine-tuned checkpoint; any failure is
/// returned so startup can abort.
pub async fn create_model(config: Config) -> Result<Arc<dyn InferenceModel>> {
    match config.model_name.as_str() {
        "dummy" => Ok(Arc::new(DummyModel::new())),
        "remote" => {
            let model = RemoteModel::new(RemoteModelConfig::from_inference_config(&config))?;
            model.health().await?;
            info!("🧠 Inference service reachable at {}", config.inference_url);

            if let Some(checkpoint) = config.checkpoint.clone() {
                let client = download_client(DEFAULT_CONNECT_TIMEOUT)?;
                let fetcher = CheckpointFetcher::new(client, checkpoint, config.api_key.clone());
                let path = fetcher.fetch().await?;
                model.load_checkpoint(&path).await?;
                info!("📦 Classifier checkpoint loaded from {}", path.display());
            }

            Ok(Arc::new(model))
        }
        other => Err(Error::Inference(format!(
            "Unknown model: {} (available: remote, dummy)",
            other
        ))),
    }
}

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Label and confidence from the classifier's three logits.
pub fn classification_from_logits(logits: &[f32]) -> Result<ClassificationResult> {
    if logits.len() != RelevanceLabel::BY_CLASS_INDEX.len() || logits.iter().any(|l| !l.is_finite()) {
        return Err(Error::Inference(format!(
            "Expected {} finite logits, got {:?}",
            RelevanceLabel::BY_CLASS_INDEX.len(),
            logits
        )));
    }

    let probabilities = softmax(logits);
    let (index, confidence) = probabilities
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, p)| if p > best.1 { (i, p) } else { best });

    let label = RelevanceLabel::from_class_index(index)
        .ok_or_else(|| Error::Inference(format!("No label for class {}", index)))?;
    Ok(ClassificationResult::new(label, confidence))
}

/// Average of per-token vectors; None when empty or ragged.
pub fn mean_pool(hidden_states: &[Vec<f32>]) -> Option<Vec<f32>> {
    let width = hidden_states.first()?.len();
    if width == 0 || hidden_states.iter().any(|row| row.len() != width) {
        return None;
    }

    let mut pooled = vec![0.0f32; width];
    for row in hidden_states {
        for (acc, value) in pooled.iter_mut().zip(row) {
            *acc += value;
        }
    }
    let count = hidden_states.len() as f32;
    pooled.iter_mut().for_each(|v| *v /= count);
    Some(pooled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probabilities = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probabilities[2] > probabilities[1] && probabilities[1] > probabilities[0]);
    }

    #[test]
    fn test_softmax_is_stable_for_large_logits() {
        let probabilities = softmax(&[1000.0, 1000.0, -1000.0]);
        assert!((probabilities[0] - 0.5).abs() < 1e-6);
        assert!(probabilities.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_classification_from_logits_uses_label_table() {
        let result = classification_from_logits(&[3.0, 0.0, 0.0]).unwrap();
        assert_eq!(result.label, RelevanceLabel::Berlebihan);
        let result = classification_from_logits(&[0.0, 3.0, 0.0]).unwrap();
        assert_eq!(result.label, RelevanceLabel::Nonrelevan);
        let result = classification_from_logits(&[0.0, 0.0, 3.0]).unwrap();
        assert_eq!(result.label, RelevanceLabel::Relevan);
        assert!(result.confidence > 0.9 && result.confidence <= 1.0);
    }

    #[test]
    fn test_uniform_logits_pick_first_class() {
        let result = classification_from_logits(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(result.label, RelevanceLabel::Berlebihan);
        assert!((result.confidence - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_bad_logits_rejected() {
        assert!(classification_from_logits(&[1.0, 2.0]).is_err());
        assert!(classification_from_logits(&[1.0, f32::NAN, 0.0]).is_err());
    }

    #[test]
    fn test_mean_pool() {
        let pooled = mean_pool(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 0.0]]).unwrap();
        assert_eq!(pooled, vec![3.0, 2.0]);
        assert!(mean_pool(&[]).is_none());
        assert!(mean_pool(&[vec![1.0], vec![1.0, 2.0]]).is_none());
    }

    #[tokio::test]
    async fn test_create_dummy_model() {
        let config = Config {
            model_name: "dummy".to_string(),
            ..Config::default()
        };
        let model = create_model(config).await.unwrap();
        assert_eq!(model.name(), "Dummy");
    }

    #[tokio::test]
    async fn test_unknown_model_rejected() {
        let config = Config {
            model_name: "gpt".to_string(),
            ..Config::default()
        };
        assert!(create_model(config).await.is_err());
    }
}
