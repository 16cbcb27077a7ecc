use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use skyport_core::PageRequest;
use skyport_shared::models::FlightPage;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/v1/flights", get(list_flights))
}

// Raw strings so that junk in `page`/`size` falls back to defaults
// instead of failing extraction.
async fn list_flights(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<FlightPage>, AppError> {
    let page = PageRequest::from_raw(
        params.get("page").map(String::as_str),
        params.get("size").map(String::as_str),
    );
    let listing = state.orchestrator.list_flights(page).await?;
    Ok(Json(listing))
}
