use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::cache::{FORAGE_STATUS_HEADER, Resolution};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{FoodLookupRequest, FoodLookupResponse, StatsResponse};
use crate::gateway::state::HandlerState;
use crate::semantic::SemanticBackend;
use crate::storage::EntryStore;

#[instrument(skip(state, request), fields(origin = tracing::field::Empty))]
pub async fn food_lookup_handler<S, M>(
    State(state): State<HandlerState<S, M>>,
    Json(request): Json<Value>,
) -> Result<Response, GatewayError>
where
    S: EntryStore + 'static,
    M: SemanticBackend + 'static,
{
    let request = parse_request(request)?;
    let food_text = request
        .food_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| GatewayError::InvalidRequest("No food_text provided".to_string()))?;

    let resolver = state.resolver.clone();
    let threshold = request.threshold;
    let resolution = tokio::task::spawn_blocking(move || resolver.resolve(&food_text, threshold))
        .await
        .map_err(|e| GatewayError::InternalError(format!("resolution task failed: {}", e)))??;

    tracing::Span::current().record("origin", resolution.origin.as_str());

    let macros = enrich(&state, &resolution).await;
    make_response(&resolution, macros)
}

fn parse_request(request: Value) -> Result<FoodLookupRequest, GatewayError> {
    serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

/// Fetches live nutrient data for records that carry nutrients; failures yield `None`.
async fn enrich<S, M>(state: &HandlerState<S, M>, resolution: &Resolution) -> Option<Value>
where
    S: EntryStore + 'static,
    M: SemanticBackend + 'static,
{
    let nutrition = state.nutrition.as_ref()?;
    if resolution.record.nutrients().is_none() {
        debug!("Record has no nutrients, skipping enrichment");
        return None;
    }

    let code = resolution.record.external_code();
    match nutrition.fetch(code).await {
        Ok(macros) => macros,
        Err(e) => {
            warn!(code = %code, error = %e, "Nutrition enrichment failed");
            None
        }
    }
}

pub(crate) fn make_response(
    resolution: &Resolution,
    macros: Option<Value>,
) -> Result<Response, GatewayError> {
    info!(
        origin = %resolution.origin,
        confidence = resolution.confidence_pct(),
        product = %resolution.record.canonical_name(),
        "Food lookup served"
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        FORAGE_STATUS_HEADER,
        HeaderValue::from_static(resolution.origin.as_header_value()),
    );

    let body = FoodLookupResponse::from_resolution(resolution, macros);
    Ok((StatusCode::OK, headers, Json(body)).into_response())
}

#[instrument(skip(state))]
pub async fn stats_handler<S, M>(State(state): State<HandlerState<S, M>>) -> Json<StatsResponse>
where
    S: EntryStore + 'static,
    M: SemanticBackend + 'static,
{
    Json(state.resolver.stats().into())
}
