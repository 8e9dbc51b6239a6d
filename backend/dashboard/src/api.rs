//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use payops_core::{
    filter_feed, payment_detail, retry_from_detail, summarize, Analytics, Feed, FeedQuery,
    Payment, PaymentDetail, PaymentForm, PaymentPatch, PaymentStore, RateIndicator, Session,
    SessionStore, StatusFilter, User,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::require_session;
use crate::errors::{DashboardError, Result};

pub struct AppState {
    pub store: PaymentStore,
    pub sessions: SessionStore,
    pub started_at: DateTime<Utc>,
}

/// All routes. Everything except `/health` and `/auth/login` needs a session.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
        .route("/payments", get(list_payments).post(submit_payment))
        .route("/payments/:id", get(get_payment).patch(update_payment))
        .route("/payments/:id/retry", post(retry_payment))
        .route("/rate-limit", get(rate_limit))
        .route("/throughput", put(set_throughput))
        .route("/analytics", get(analytics))
        .route_layer(from_fn_with_state(state.sessions.clone(), require_session));

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .merge(protected)
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub started_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The signed-in user. The bearer token is only ever returned by login.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: User,
    pub logged_in_at: DateTime<Utc>,
}

impl From<Session> for SessionInfo {
    fn from(session: Session) -> Self {
        Self {
            user: session.user,
            logged_in_at: session.logged_in_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub q: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct ThroughputRequest {
    pub tps: f64,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        started_at: state.started_at,
    })
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Session>> {
    Ok(Json(state.sessions.login(&req.username, &req.password)?))
}

/// `POST /auth/logout`
pub async fn logout(State(state): State<Arc<AppState>>) -> StatusCode {
    state.sessions.logout();
    StatusCode::NO_CONTENT
}

/// `GET /auth/session`
pub async fn current_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionInfo>> {
    state
        .sessions
        .current()
        .map(|session| Json(SessionInfo::from(session)))
        .ok_or(DashboardError::Unauthorized)
}

/// `GET /payments?q=&status=`
///
/// The live feed: text search and status filter, newest first.
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FeedParams>,
) -> Result<Json<Feed>> {
    let status = match params.status.as_deref() {
        Some(s) => s.parse()?,
        None => StatusFilter::All,
    };
    let query = FeedQuery {
        text: params.q.unwrap_or_default(),
        status,
    };
    Ok(Json(filter_feed(&state.store.snapshot(), &query)))
}

/// `POST /payments`
pub async fn submit_payment(
    State(state): State<Arc<AppState>>,
    Json(form): Json<PaymentForm>,
) -> Result<(StatusCode, Json<Payment>)> {
    let payment = form.submit(&state.store)?;
    info!("Payment {} submitted via API", payment.id);
    Ok((StatusCode::CREATED, Json(payment)))
}

/// `GET /payments/:id`
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PaymentDetail>> {
    payment_detail(&state.store, &id)
        .map(Json)
        .ok_or(DashboardError::NotFound(id))
}

/// `PATCH /payments/:id`
pub async fn update_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<PaymentPatch>,
) -> Result<Json<Payment>> {
    state
        .store
        .update(&id, patch)?
        .map(Json)
        .ok_or(DashboardError::NotFound(id))
}

/// `POST /payments/:id/retry`
pub async fn retry_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PaymentDetail>> {
    retry_from_detail(&state.store, &id)?
        .map(Json)
        .ok_or(DashboardError::NotFound(id))
}

/// `GET /rate-limit`
pub async fn rate_limit(State(state): State<Arc<AppState>>) -> Json<RateIndicator> {
    Json(RateIndicator::from(state.store.rate_limit()))
}

/// `PUT /throughput`
pub async fn set_throughput(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ThroughputRequest>,
) -> Result<Json<RateIndicator>> {
    state.store.set_throughput(req.tps)?;
    Ok(Json(RateIndicator::from(state.store.rate_limit())))
}

/// `GET /analytics`
pub async fn analytics(State(state): State<Arc<AppState>>) -> Json<Analytics> {
    Json(summarize(&state.store.snapshot(), state.store.current_tps()))
}
