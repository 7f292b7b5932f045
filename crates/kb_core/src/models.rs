use async_trait::async_trait;
use std::fmt;

use crate::types::ClassificationResult;
use crate::Result;

/// Handle to the pretrained summarizer, encoder and fine-tuned classifier.
///
/// Implementations are created once at startup and shared read-only between
/// requests.
#[async_trait]
pub trait InferenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Extractive summary keeping roughly `ratio` of the sentences.
    async fn summarize(&self, text: &str, ratio: f32) -> Result<String>;

    /// Mean-pooled last hidden state of the encoder.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Three-way relevance classification of a title/content pair.
    async fn classify(&self, title: &str, content: &str) -> Result<ClassificationResult>;
}
