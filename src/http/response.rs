//! Responses produced by the proxy itself.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// `404 {"result":"page not found"}`.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"result": "page not found"}))).into_response()
}

/// `301` to `path`, keeping the original query string.
pub fn moved_permanently(path: &str, query: Option<&str>) -> Response {
    let location = match query {
        Some(q) => format!("{path}?{q}"),
        None => path.to_string(),
    };

    match HeaderValue::try_from(location) {
        Ok(location) => {
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, path, "cannot build redirect location");
            not_found()
        }
    }
}
