use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use kb_core::SessionId;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "kb_session";

/// Session id carried by the request's cookies, if any.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// The request's session, or a freshly issued one that still needs its cookie set.
pub fn resolve_session(headers: &HeaderMap) -> (SessionId, Option<SessionId>) {
    match session_from_headers(headers) {
        Some(session) => (session, None),
        None => {
            let session = Uuid::new_v4();
            (session, Some(session))
        }
    }
}

pub fn session_cookie(session: SessionId) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session
    )
}

pub fn with_session_cookie(mut response: Response, issued: Option<SessionId>) -> Response {
    if let Some(session) = issued {
        if let Ok(value) = HeaderValue::from_str(&session_cookie(session)) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}
