use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use kb_core::Article;
use serde::Deserialize;
use tracing::{error, info};

use crate::pages;
use crate::session::{resolve_session, session_from_headers, with_session_cookie};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LinkForm {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

fn page(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn landing(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::landing_page(&state.datasets))
}

pub async fn link_form(headers: HeaderMap) -> Response {
    let (_, issued) = resolve_session(&headers);
    with_session_cookie(page(StatusCode::OK, pages::link_page("", None)), issued)
}

pub async fn submit_link(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<LinkForm>,
) -> Response {
    let (session, issued) = resolve_session(&headers);
    let url = form.url.trim();
    if url.is_empty() {
        let html = pages::link_page("", Some(pages::MSG_NO_URL));
        return with_session_cookie(page(StatusCode::UNPROCESSABLE_ENTITY, html), issued);
    }

    // Every failure gets the same message; the manager logs the cause
    let Some(article) = state.scrapers.try_scrape(url).await else {
        let html = pages::link_page(url, Some(pages::MSG_SCRAPE_FAILED));
        return with_session_cookie(page(StatusCode::UNPROCESSABLE_ENTITY, html), issued);
    };

    store_and_continue(&state, session, issued, article).await
}

pub async fn content_form(headers: HeaderMap) -> Response {
    let (_, issued) = resolve_session(&headers);
    with_session_cookie(page(StatusCode::OK, pages::content_page("", "", None)), issued)
}

pub async fn submit_content(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ContentForm>,
) -> Response {
    let (session, issued) = resolve_session(&headers);
    if form.title.trim().is_empty() || form.content.trim().is_empty() {
        let html = pages::content_page(&form.title, &form.content, Some(pages::MSG_NO_DATA));
        return with_session_cookie(page(StatusCode::UNPROCESSABLE_ENTITY, html), issued);
    }

    let article = Article::manual(form.title, form.content);
    store_and_continue(&state, session, issued, article).await
}

async fn store_and_continue(
    state: &AppState,
    session: kb_core::SessionId,
    issued: Option<kb_core::SessionId>,
    article: Article,
) -> Response {
    if let Err(e) = state.sessions.put(session, article).await {
        error!("Could not store article for session {}: {}", session, e);
        return page(StatusCode::INTERNAL_SERVER_ERROR, pages::error_page(&e.to_string()));
    }
    with_session_cookie(Redirect::to("/result").into_response(), issued)
}

pub async fn result(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let Some(session) = session_from_headers(&headers) else {
        return Redirect::to("/").into_response();
    };

    let article = match state.sessions.take(session).await {
        Ok(Some(article)) => article,
        Ok(None) => return Redirect::to("/").into_response(),
        Err(e) => {
            error!("Could not read session {}: {}", session, e);
            return page(StatusCode::INTERNAL_SERVER_ERROR, pages::error_page(&e.to_string()));
        }
    };

    match state.pipeline.analyze(&article).await {
        Ok(analysis) => {
            info!(
                "✅ {} article classified as {}",
                analysis.article.source, analysis.classification.label
            );
            page(StatusCode::OK, pages::result_page(&analysis))
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            page(StatusCode::BAD_GATEWAY, pages::error_page(&e.to_string()))
        }
    }
}
