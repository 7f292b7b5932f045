use std::collections::HashSet;
use std::fmt;

use kb_core::{ClassificationResult, InferenceModel, Result};
use lazy_static::lazy_static;
use regex::Regex;

use super::classification_from_logits;

pub const DUMMY_EMBEDDING_SIZE: usize = 768;

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+\s+").unwrap();
    static ref WORD: Regex = Regex::new(r"[[:alnum:]]+").unwrap();
}

/// Offline stand-in for the pretrained models. Deterministic, so it backs the
/// tests and lets the UI run without the inference service.
pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

fn sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_END.find_iter(text) {
        sentences.push(text[start..boundary.end()].trim());
        start = boundary.end();
    }
    if start < text.len() {
        sentences.push(text[start..].trim());
    }
    sentences.into_iter().filter(|s| !s.is_empty()).collect()
}

fn words(text: &str) -> HashSet<String> {
    WORD.find_iter(text).map(|w| w.as_str().to_lowercase()).collect()
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn summarize(&self, text: &str, ratio: f32) -> Result<String> {
        // Leading sentences, as many as the ratio allows, at least one
        let sentences = sentences(text);
        let keep = ((sentences.len() as f32 * ratio.clamp(0.0, 1.0)).ceil() as usize).max(1);
        Ok(sentences.into_iter().take(keep).collect::<Vec<_>>().join(" "))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embedding = vec![0.0; DUMMY_EMBEDDING_SIZE];
        let text_len = text.chars().count() as f32;
        if text_len == 0.0 {
            return Ok(embedding);
        }

        embedding[0] = text_len / 1000.0;
        for c in text.chars() {
            let slot = 1 + (c as u32 as usize) % (DUMMY_EMBEDDING_SIZE - 1);
            embedding[slot] += 1.0 / text_len;
        }

        Ok(embedding)
    }

    async fn classify(&self, title: &str, content: &str) -> Result<ClassificationResult> {
        // Share of title words that the content repeats
        let title_words = words(title);
        let content_words = words(content);
        let overlap = if title_words.is_empty() {
            0.0
        } else {
            title_words.intersection(&content_words).count() as f32 / title_words.len() as f32
        };

        let logits = [
            1.0 - 4.0 * (overlap - 0.5).abs(),
            2.0 - 4.0 * overlap,
            4.0 * overlap - 2.0,
        ];
        classification_from_logits(&logits)
    }
}
