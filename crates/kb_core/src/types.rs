use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Where an article came from. Drives the source-specific text cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Detik,
    Kompas,
    Suara,
    Manual,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Detik => "detik",
            Source::Kompas => "kompas",
            Source::Suara => "suara",
            Source::Manual => "manual",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "detik" => Ok(Source::Detik),
            "kompas" => Ok(Source::Kompas),
            "suara" => Ok(Source::Suara),
            "manual" => Ok(Source::Manual),
            other => Err(Error::InvalidInput(format!("unknown source: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub url: Option<String>,
    pub title: String,
    pub content: String,
    pub source: Source,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub fn new(title: impl Into<String>, content: impl Into<String>, source: Source) -> Self {
        Self {
            url: None,
            title: title.into(),
            content: content.into(),
            source,
            created_at: Utc::now(),
        }
    }

    /// An article typed in by hand on the content page.
    pub fn manual(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(title, content, Source::Manual)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceLabel {
    Relevan,
    Berlebihan,
    Nonrelevan,
}

impl RelevanceLabel {
    /// Labels in classifier output order.
    pub const BY_CLASS_INDEX: [RelevanceLabel; 3] = [
        RelevanceLabel::Berlebihan,
        RelevanceLabel::Nonrelevan,
        RelevanceLabel::Relevan,
    ];

    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::BY_CLASS_INDEX.get(index).copied()
    }

    pub fn class_index(&self) -> usize {
        match self {
            RelevanceLabel::Berlebihan => 0,
            RelevanceLabel::Nonrelevan => 1,
            RelevanceLabel::Relevan => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceLabel::Relevan => "relevan",
            RelevanceLabel::Berlebihan => "berlebihan",
            RelevanceLabel::Nonrelevan => "nonrelevan",
        }
    }

    /// Chart colour used for this label everywhere in the UI.
    pub fn color(&self) -> &'static str {
        match self {
            RelevanceLabel::Nonrelevan => "#FF5733",
            RelevanceLabel::Berlebihan => "#33FF57",
            RelevanceLabel::Relevan => "#3357FF",
        }
    }
}

impl fmt::Display for RelevanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelevanceLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relevan" => Ok(RelevanceLabel::Relevan),
            "berlebihan" => Ok(RelevanceLabel::Berlebihan),
            "nonrelevan" => Ok(RelevanceLabel::Nonrelevan),
            other => Err(Error::InvalidInput(format!("unknown label: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: RelevanceLabel,
    pub confidence: f32,
}

impl ClassificationResult {
    /// Confidence is clamped into [0, 1]; NaN becomes 0.
    pub fn new(label: RelevanceLabel, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { label, confidence }
    }
}

/// Cosine similarity between the summary title and summary content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityScore(f32);

impl SimilarityScore {
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(-1.0, 1.0))
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

/// Everything the result page shows for one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub article: Article,
    pub processed_title: String,
    pub processed_content: String,
    pub summary: Summary,
    pub similarity: SimilarityScore,
    pub classification: ClassificationResult,
}
