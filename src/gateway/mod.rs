//! HTTP gateway (Axum) for food lookups.
//!
//! This module is primarily used by the `forage` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{food_lookup_handler, stats_handler};
pub use state::HandlerState;

use crate::cache::{
    FORAGE_STATUS_ERROR, FORAGE_STATUS_HEADER, FORAGE_STATUS_HEALTHY, FORAGE_STATUS_NOT_READY,
    FORAGE_STATUS_READY,
};
use crate::semantic::SemanticBackend;
use crate::storage::EntryStore;

pub fn create_router_with_state<S, M>(state: HandlerState<S, M>) -> Router
where
    S: EntryStore + 'static,
    M: SemanticBackend + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler::<S, M>))
        .route("/food_lookup", post(food_lookup_handler::<S, M>))
        .route("/cache/stats", get(stats_handler::<S, M>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub storage: &'static str,
    pub corpus: &'static str,
    pub nutrition: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        FORAGE_STATUS_HEADER,
        HeaderValue::from_static(FORAGE_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<S, M>(State(state): State<HandlerState<S, M>>) -> Response
where
    S: EntryStore + 'static,
    M: SemanticBackend + 'static,
{
    let storage_status = if state.storage_path.is_dir() {
        FORAGE_STATUS_READY
    } else {
        FORAGE_STATUS_ERROR
    };

    let corpus_status = if state.resolver.semantic().corpus_rows() > 0 {
        FORAGE_STATUS_READY
    } else {
        FORAGE_STATUS_NOT_READY
    };

    let nutrition_status = if state.nutrition.is_some() {
        "enabled"
    } else {
        "disabled"
    };

    let components = ComponentStatus {
        http: FORAGE_STATUS_READY,
        storage: storage_status,
        corpus: corpus_status,
        nutrition: nutrition_status,
        embedder_mode: state.embedder_mode,
    };

    let is_ready =
        components.storage == FORAGE_STATUS_READY && components.corpus == FORAGE_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(FORAGE_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
