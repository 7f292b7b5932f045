use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use kb_core::{Analysis, Article, Source};
use serde::Deserialize;

use crate::datasets::LabelDistribution;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub source: Option<Source>,
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::unprocessable(format!("missing field: {}", field))),
    }
}

async fn scrape(state: &AppState, url: &str) -> Result<Article, ApiError> {
    if url.trim().is_empty() {
        return Err(ApiError::unprocessable("missing field: url"));
    }
    state
        .scrapers
        .scrape_url(url)
        .await
        .map_err(ApiError::scrape_failed)
}

pub async fn scrape_article(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UrlRequest>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(scrape(&state, &request.url).await?))
}

pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<Analysis>, ApiError> {
    let title = required("title", request.title)?;
    let content = required("content", request.content)?;
    let article = Article::new(title, content, request.source.unwrap_or(Source::Manual));
    Ok(Json(state.pipeline.analyze(&article).await?))
}

pub async fn classify_url(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UrlRequest>,
) -> Result<Json<Analysis>, ApiError> {
    let article = scrape(&state, &request.url).await?;
    Ok(Json(state.pipeline.analyze(&article).await?))
}

pub async fn datasets(State(state): State<Arc<AppState>>) -> Json<Vec<LabelDistribution>> {
    Json(state.datasets.clone())
}
