use std::sync::Arc;
use std::time::Instant;

use kb_core::{Analysis, Article, InferenceModel, Result, Summary};
use tracing::{debug, info, instrument};

use crate::embeddings::EmbeddingGenerator;
use crate::preprocess::normalize;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Share of sentences the summarizer keeps
    pub summary_ratio: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { summary_ratio: 0.5 }
    }
}

/// normalize → summarize → embed → similarity → classify, for one article.
pub struct Pipeline {
    model: Arc<dyn InferenceModel>,
    embeddings: EmbeddingGenerator,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(model: Arc<dyn InferenceModel>, config: PipelineConfig) -> Self {
        Self {
            embeddings: EmbeddingGenerator::new(model.clone()),
            model,
            config,
        }
    }

    #[instrument(skip(self, article), fields(source = %article.source))]
    pub async fn analyze(&self, article: &Article) -> Result<Analysis> {
        let started = Instant::now();

        let processed_title = normalize(&article.title, article.source);
        let processed_content = normalize(&article.content, article.source);
        debug!(
            "🧹 Normalized title ({} chars) and content ({} chars)",
            processed_title.len(),
            processed_content.len()
        );

        let combined = format!("{}. {}", processed_title.trim(), processed_content.trim());
        let summary = split_summary(&self.model.summarize(&combined, self.config.summary_ratio).await?);
        debug!("📝 Summary ready after {:?}", started.elapsed());

        let similarity = self.embeddings.summary_similarity(&summary).await?;
        debug!("🔢 Title/content similarity {:.3}", similarity.value());

        let classification = self.model.classify(&summary.title, &summary.content).await?;
        info!(
            "🏷️ Classified as {} ({:.3}) in {:?}",
            classification.label,
            classification.confidence,
            started.elapsed()
        );

        Ok(Analysis {
            article: article.clone(),
            processed_title,
            processed_content,
            summary,
            similarity,
            classification,
        })
    }
}

/// First sentence becomes the title, the remainder the content.
pub fn split_summary(summary: &str) -> Summary {
    let mut parts = summary.trim().split(". ");
    let title = parts.next().unwrap_or("").trim().to_string();
    let content = parts.collect::<Vec<_>>().join(". ").trim().to_string();
    Summary { title, content }
}
