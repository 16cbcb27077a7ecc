use axum::{extract::FromRequestParts, http::request::Parts};
use skyport_shared::models::FieldError;
use skyport_shared::{CallerIdentity, IDENTITY_HEADER};

use crate::error::AppError;

/// Extracts the caller identity from `X-User-Name`.
///
/// Handlers that take a `Caller` reject a missing or blank header with 400
/// before any backend is contacted. The header is read as UTF-8 so names
/// outside ASCII pass through unchanged.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerIdentity);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
            .and_then(CallerIdentity::parse)
            .map(Caller)
            .ok_or_else(|| {
                AppError::bad_request(
                    "Missing caller identity",
                    vec![FieldError::new(IDENTITY_HEADER, "header is required")],
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&[u8]>) -> Result<Caller, AppError> {
        let mut builder = Request::builder().uri("/api/v1/me");
        if let Some(value) = header {
            builder = builder.header(IDENTITY_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_present_header_is_kept_verbatim() {
        let Caller(identity) = extract(Some(b"Test Max")).await.unwrap();
        assert_eq!(identity.as_str(), "Test Max");
    }

    #[tokio::test]
    async fn test_utf8_header_is_accepted() {
        let Caller(identity) = extract(Some("Иван".as_bytes())).await.unwrap();
        assert_eq!(identity.as_str(), "Иван");
    }

    #[tokio::test]
    async fn test_missing_or_blank_header_is_rejected() {
        assert!(matches!(extract(None).await, Err(AppError::BadRequest { .. })));
        assert!(matches!(extract(Some(b"   ")).await, Err(AppError::BadRequest { .. })));
    }
}
