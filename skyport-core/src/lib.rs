pub mod flight_set;
pub mod pagination;
pub mod ports;

use skyport_shared::models::FieldError;
use std::fmt;

pub use flight_set::{CatalogSnapshot, FlightNumberSet};
pub use pagination::PageRequest;
pub use ports::{FlightCatalog, TicketLedger, UserTickets};

/// The downstream service a call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Catalog,
    Ledger,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Catalog => write!(f, "flight catalog"),
            Backend::Ledger => write!(f, "ticket ledger"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Validation failed: {message}")]
    ValidationFailed {
        message: String,
        errors: Vec<FieldError>,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{backend} is unavailable: {reason}")]
    BackendUnavailable { backend: Backend, reason: String },
    #[error("{backend} rejected the call with status {status}")]
    BackendRejected {
        backend: Backend,
        status: u16,
        body: String,
    },
    #[error("{backend} returned an unexpected payload: {reason}")]
    DecodeFailure { backend: Backend, reason: String },
}

impl GatewayError {
    pub fn validation(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        GatewayError::ValidationFailed {
            message: message.into(),
            errors,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        GatewayError::NotFound(message.into())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
