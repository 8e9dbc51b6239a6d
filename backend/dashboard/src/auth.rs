//! Bearer-token gate in front of the dashboard routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use payops_core::SessionStore;
use tracing::debug;

use crate::errors::DashboardError;

/// Lets the request through only if it carries the live session's token.
pub async fn require_session(
    State(sessions): State<SessionStore>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("");

    if sessions.authorize(token).is_none() {
        debug!("Rejected {} {}: no valid session", request.method(), request.uri());
        return DashboardError::Unauthorized.into_response();
    }

    next.run(request).await
}
