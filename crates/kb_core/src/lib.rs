pub mod error;
pub mod models;
pub mod similarity;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use models::InferenceModel;
pub use similarity::cosine_similarity;
pub use storage::{SessionId, SessionStore};
pub use types::{
    Analysis, Article, ClassificationResult, RelevanceLabel, SimilarityScore, Source, Summary,
};
