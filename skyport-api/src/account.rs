use axum::{extract::State, routing::get, Json, Router};
use skyport_shared::models::{PrivilegeAccount, UserInfo};

use crate::error::AppError;
use crate::middleware::Caller;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/me", get(me))
        .route("/api/v1/privilege", get(privilege))
}

/// Tickets (enriched) plus the short privilege view.
async fn me(
    State(state): State<AppState>,
    Caller(identity): Caller,
) -> Result<Json<UserInfo>, AppError> {
    Ok(Json(state.orchestrator.user_info(&identity).await?))
}

async fn privilege(
    State(state): State<AppState>,
    Caller(identity): Caller,
) -> Result<Json<PrivilegeAccount>, AppError> {
    Ok(Json(state.orchestrator.privilege(&identity).await?))
}
