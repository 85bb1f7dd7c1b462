//! Request tracing middleware.
//!
//! Every request runs inside a `request` span carrying its id, route and
//! the caller's `Player-ID`, so handler and table logs for one poll line up.
//! A caller-supplied `x-request-id` is kept; otherwise a UUID is generated.
//! Either way it is echoed on the response.

use axum::{
    extract::{FromRequestParts, MatchedPath, Request},
    http::{HeaderMap, HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use thumbs_up::router::PLAYER_ID_HEADER;
use tracing::Instrument;
use uuid::Uuid;

use crate::metrics;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Route label for requests that matched no endpoint.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Correlation id of the request being served.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

impl RequestId {
    fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reads the id stored by [`request_id_middleware`]. Routers built without
/// the middleware get a fresh id.
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| RequestId::from_headers(&parts.headers)))
    }
}

/// Route template the request matched, or [`UNMATCHED_ROUTE`].
///
/// Metrics are labelled with this rather than the raw path, which would add
/// a series for every unknown URL.
fn route_label(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
        .to_string()
}

/// Caller named by `Player-ID`, `-` for anonymous polls.
fn caller(headers: &HeaderMap) -> String {
    headers
        .get(PLAYER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("-")
        .to_string()
}

/// Wrap the request in a tracing span, count it, and tag the response with
/// its request id.
///
/// ```no_run
/// use axum::{Router, middleware, routing::get};
/// use tu_server::api::request_id::request_id_middleware;
///
/// let app: Router = Router::new()
///     .route("/game_state", get(|| async { "{}" }))
///     .layer(middleware::from_fn(request_id_middleware));
/// ```
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());
    let method = request.method().clone();
    let route = route_label(&request);
    let span = tracing::info_span!(
        "request",
        request_id = %request_id.as_str(),
        %method,
        %route,
        player_id = %caller(request.headers()),
    );

    request.extensions_mut().insert(request_id.clone());

    let mut response = async move {
        tracing::debug!("Request started");
        let response = next.run(request).await;
        tracing::debug!(status = %response.status(), "Request completed");
        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    metrics::http_requests_total(method.as_str(), &route, response.status().as_u16());

    response
}
