use std::sync::Arc;

use kb_core::{cosine_similarity, InferenceModel, Result, SimilarityScore, Summary};

pub struct EmbeddingGenerator {
    model: Arc<dyn InferenceModel>,
}

impl EmbeddingGenerator {
    pub fn new(model: Arc<dyn InferenceModel>) -> Self {
        Self { model }
    }

    pub async fn generate_text_embedding(&self, text: &str) -> Result<Vec<f32>> {
        self.model.embed(text).await
    }

    /// How close the summary title is to the summary body.
    pub async fn summary_similarity(&self, summary: &Summary) -> Result<SimilarityScore> {
        let title = self.generate_text_embedding(&summary.title).await?;
        let content = self.generate_text_embedding(&summary.content).await?;
        Ok(SimilarityScore::new(cosine_similarity(&title, &content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyModel;

    #[tokio::test]
    async fn test_embedding_generation() {
        let generator = EmbeddingGenerator::new(Arc::new(DummyModel::new()));
        let embedding = generator.generate_text_embedding("Test text").await.unwrap();
        assert!(!embedding.is_empty());
    }

    #[tokio::test]
    async fn test_summary_similarity() {
        let generator = EmbeddingGenerator::new(Arc::new(DummyModel::new()));

        let same = Summary {
            title: "Harga beras naik".to_string(),
            content: "Harga beras naik".to_string(),
        };
        let score = generator.summary_similarity(&same).await.unwrap();
        assert!((score.value() - 1.0).abs() < 1e-5);

        let empty = Summary {
            title: "Harga beras naik".to_string(),
            content: String::new(),
        };
        assert_eq!(generator.summary_similarity(&empty).await.unwrap().value(), 0.0);
    }
}
