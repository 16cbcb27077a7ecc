use axum::{
    http::{HeaderName, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod account;
pub mod error;
pub mod flights;
pub mod middleware;
pub mod state;
pub mod tickets;

pub use error::AppError;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let allow_origin = if state.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(state.allowed_origins.iter().cloned())
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            // skyport_shared::IDENTITY_HEADER, lowercased
            HeaderName::from_static("x-user-name"),
        ]);

    Router::new()
        .merge(flights::routes())
        .merge(tickets::routes())
        .merge(account::routes())
        .route("/manage/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

