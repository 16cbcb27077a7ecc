use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use skyport_shared::models::{EnrichedTicket, FieldError, PurchaseRequest, PurchaseResponse};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::Caller;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tickets", get(list_tickets).post(purchase_ticket))
        .route("/api/v1/tickets/{ticket_uid}", get(get_ticket).delete(refund_ticket))
}

fn parse_uid(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        AppError::bad_request(
            "Invalid ticket uid",
            vec![FieldError::new("ticketUid", "must be a UUID")],
        )
    })
}

async fn list_tickets(
    State(state): State<AppState>,
    Caller(identity): Caller,
) -> Result<Json<Vec<EnrichedTicket>>, AppError> {
    let tickets = state.orchestrator.list_tickets(&identity).await?;
    Ok(Json(tickets))
}

async fn purchase_ticket(
    State(state): State<AppState>,
    Caller(identity): Caller,
    body: Result<Json<PurchaseRequest>, JsonRejection>,
) -> Result<Json<PurchaseResponse>, AppError> {
    let Json(request) = body?;
    let response = state.orchestrator.purchase(&identity, request).await?;
    tracing::info!(ticket_uid = %response.ticket.ticket_uid, "Ticket purchased");
    Ok(Json(response))
}

async fn get_ticket(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(ticket_uid): Path<String>,
) -> Result<Json<EnrichedTicket>, AppError> {
    let ticket_uid = parse_uid(&ticket_uid)?;
    let ticket = state.orchestrator.get_ticket(&identity, ticket_uid).await?;
    Ok(Json(ticket))
}

async fn refund_ticket(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(ticket_uid): Path<String>,
) -> Result<StatusCode, AppError> {
    let ticket_uid = parse_uid(&ticket_uid)?;
    state.orchestrator.refund(&identity, ticket_uid).await?;
    tracing::info!(%ticket_uid, "Ticket refunded");
    Ok(StatusCode::NO_CONTENT)
}
