use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use skyport_core::GatewayError;
use skyport_shared::models::{ErrorBody, FieldError, ValidationErrorBody};

const UNAVAILABLE: &str = "Service temporarily unavailable";
const INTERNAL: &str = "Internal Server Error";

#[derive(Debug)]
pub enum AppError {
    /// Rejected at the HTTP surface, before any backend call.
    BadRequest {
        message: String,
        errors: Vec<FieldError>,
    },
    Gateway(GatewayError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            errors,
        }
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::Gateway(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Malformed request body",
            vec![FieldError::new("body", rejection.body_text())],
        )
    }
}

fn validation(message: String, errors: Vec<FieldError>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationErrorBody { message, errors }),
    )
        .into_response()
}

fn plain(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = match self {
            AppError::BadRequest { message, errors } => return validation(message, errors),
            AppError::Gateway(err) => err,
        };

        match err {
            GatewayError::ValidationFailed { message, errors } => validation(message, errors),
            GatewayError::NotFound(message) => plain(StatusCode::NOT_FOUND, message),
            GatewayError::BackendUnavailable { backend, reason } => {
                tracing::error!(%backend, "Backend unavailable: {}", reason);
                plain(StatusCode::BAD_GATEWAY, UNAVAILABLE)
            }
            GatewayError::BackendRejected {
                backend,
                status,
                body,
            } => {
                tracing::error!(%backend, status, "Backend rejected request: {}", body);
                plain(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
            GatewayError::DecodeFailure { backend, reason } => {
                tracing::error!(%backend, "Undecodable backend response: {}", reason);
                plain(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use skyport_core::Backend;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_keeps_field_errors() {
        let (status, body) = render(
            GatewayError::validation("Invalid purchase request", vec![FieldError::new("price", "must be positive")]).into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid purchase request");
        assert_eq!(body["errors"][0]["field"], "price");
    }

    #[tokio::test]
    async fn test_backend_details_are_not_leaked() {
        let (status, body) = render(
            GatewayError::BackendRejected {
                backend: Backend::Ledger,
                status: 500,
                body: "stack trace at db.rs:42".to_string(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], INTERNAL);

        let (status, body) = render(
            GatewayError::BackendUnavailable {
                backend: Backend::Catalog,
                reason: "connection refused 10.0.0.7:8060".to_string(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.to_string().contains("10.0.0.7"));
    }

    #[tokio::test]
    async fn test_decode_failure_is_internal_with_generic_body() {
        let (status, body) = render(
            GatewayError::DecodeFailure {
                backend: Backend::Catalog,
                reason: "missing field `flightNumber` at line 1".to_string(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], INTERNAL);
        assert!(!body.to_string().contains("flightNumber"));
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let (status, body) = render(GatewayError::not_found("Ticket not found").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Ticket not found");
    }
}
