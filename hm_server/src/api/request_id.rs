//! `x-request-id` propagation.
//!
//! Every request carries an id, taken from the caller when it looks sane or
//! generated otherwise. Handlers read it through the [`RequestId`] extractor
//! to tag store failures in the logs, and it is echoed on the response.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, HeaderValue, StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::{ApiError, api_error};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is kept
const MAX_REQUEST_ID_LEN: usize = 64;

/// Caller ids end up in log lines, so only short printable ASCII is reused
fn resolve_request_id(headers: &HeaderMap) -> RequestId {
    let incoming = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| {
            !s.is_empty()
                && s.len() <= MAX_REQUEST_ID_LEN
                && s.bytes().all(|b| b.is_ascii_graphic())
        });

    match incoming {
        Some(id) => RequestId(id.to_string()),
        None => RequestId(Uuid::new_v4().to_string()),
    }
}

/// Attach a [`RequestId`] to the request and echo it on the response.
///
/// ```no_run
/// use axum::{Router, middleware, routing::get};
/// use hm_server::api::request_id::request_id_middleware;
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "Hello" }))
///     .layer(middleware::from_fn(request_id_middleware));
/// ```
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = resolve_request_id(request.headers());
    let header = HeaderValue::from_str(request_id.as_str()).ok();

    tracing::debug!(
        request_id = %request_id.as_str(),
        method = %request.method(),
        uri = %request.uri(),
        "request received"
    );
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(header) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, header);
    }
    response
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RequestId>().cloned().ok_or_else(|| {
            tracing::error!("request id middleware is not installed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })
    }
}
