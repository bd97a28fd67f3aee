//! Reverse proxy for `/api/*`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser only talks to this host. Every `/api/...` request is replayed
//! against `PORTAL_API_BASE_URL` with the same method, path, query, headers
//! (minus hop-by-hop ones) and body, and the upstream response is relayed
//! back unchanged. Authentication stays between browser and upstream: the
//! bearer header passes through untouched.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures become `502`/`504` with a `{ "message": ... }` body so
//! the client's error mapping shows something readable.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// Largest request body forwarded; a dossier upload carries a handful of
/// 3 MB PDFs at most.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

static HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    header::HOST,
    header::CONTENT_LENGTH,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("request body too large")]
    BodyTooLarge,
    #[error("upstream timed out")]
    Timeout,
    #[error("upstream unreachable: {0}")]
    Upstream(String),
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BodyTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { Self::Timeout } else { Self::Upstream(err.to_string()) }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "success": false, "message": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

/// Upstream URL for a request path (with query) under the API base.
#[must_use]
pub fn upstream_url(base: &str, path_and_query: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path_and_query.trim_start_matches('/'))
}

/// Copy `headers` minus hop-by-hop entries.
#[must_use]
pub fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in &HOP_BY_HOP {
        out.remove(name);
    }
    out
}

pub async fn forward(State(state): State<AppState>, request: Request) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path_and_query().map_or_else(|| parts.uri.path(), |pq| pq.as_str());
    let url = upstream_url(&state.config.api_base_url, path);

    let bytes: Bytes = axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|_| ProxyError::BodyTooLarge)?;

    let upstream = state
        .http
        .request(parts.method.clone(), &url)
        .headers(forwardable_headers(&parts.headers))
        .body(bytes)
        .send()
        .await
        .map_err(|e| {
            tracing::warn!(method = %parts.method, path = %parts.uri.path(), error = %e, "api proxy failed");
            ProxyError::from(e)
        })?;

    let status = upstream.status();
    let headers = forwardable_headers(upstream.headers());
    let payload = upstream.bytes().await?;
    if status.is_server_error() {
        tracing::warn!(method = %parts.method, path = %parts.uri.path(), %status, "upstream error");
    } else {
        tracing::debug!(method = %parts.method, path = %parts.uri.path(), %status, "proxied");
    }

    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}
