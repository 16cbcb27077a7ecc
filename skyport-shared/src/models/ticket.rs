use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::FieldError;
use super::flight::FlightSummary;
use super::privilege::PrivilegeShort;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Paid,
    Canceled,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Paid => write!(f, "PAID"),
            TicketStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// A ticket as the ledger knows it: no route data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub ticket_uid: Uuid,
    pub flight_number: String,
    pub price: i32,
    pub status: TicketStatus,
}

/// A ledger ticket decorated with catalog route data.
///
/// `from_airport`, `to_airport` and `date` are filled iff a catalog entry for
/// `flight_number` was found, and are empty strings otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTicket {
    pub ticket_uid: Uuid,
    pub flight_number: String,
    pub from_airport: String,
    pub to_airport: String,
    pub date: String,
    pub price: i32,
    pub status: TicketStatus,
}

impl EnrichedTicket {
    /// Build from a ledger ticket and its catalog match, if any.
    ///
    /// Route fields are taken from `flight` wholesale, so joining the same
    /// ticket against the same snapshot always yields the same value.
    pub fn join(ticket: Ticket, flight: Option<&FlightSummary>) -> Self {
        let (from_airport, to_airport, date) = match flight {
            Some(f) => (f.from_airport.clone(), f.to_airport.clone(), f.date.clone()),
            None => (String::new(), String::new(), String::new()),
        };

        Self {
            ticket_uid: ticket.ticket_uid,
            flight_number: ticket.flight_number,
            from_airport,
            to_airport,
            date,
            price: ticket.price,
            status: ticket.status,
        }
    }

    pub fn is_enriched(&self) -> bool {
        !(self.from_airport.is_empty() && self.to_airport.is_empty() && self.date.is_empty())
    }
}

impl From<EnrichedTicket> for Ticket {
    fn from(t: EnrichedTicket) -> Self {
        Ticket {
            ticket_uid: t.ticket_uid,
            flight_number: t.flight_number,
            price: t.price,
            status: t.status,
        }
    }
}

/// Body of `POST /api/v1/tickets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub flight_number: String,
    pub price: i32,
    #[serde(default)]
    pub paid_from_balance: bool,
}

impl PurchaseRequest {
    /// Check the request shape. All problems are reported, not just the first.
    pub fn validate(self) -> Result<ValidatedPurchase, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.flight_number.trim().is_empty() {
            errors.push(FieldError::new("flightNumber", "must not be blank"));
        }
        if self.price < 1 {
            errors.push(FieldError::new("price", "must be greater than or equal to 1"));
        }

        if errors.is_empty() {
            Ok(ValidatedPurchase(self))
        } else {
            Err(errors)
        }
    }
}

/// A purchase request that passed [`PurchaseRequest::validate`].
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct ValidatedPurchase(PurchaseRequest);

impl ValidatedPurchase {
    pub fn flight_number(&self) -> &str {
        &self.0.flight_number
    }

    pub fn price(&self) -> i32 {
        self.0.price
    }

    pub fn paid_from_balance(&self) -> bool {
        self.0.paid_from_balance
    }
}

/// What the ledger reports after a purchase: the new ticket, how it was paid
/// and the buyer's account afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseResult {
    pub ticket: Ticket,
    pub paid_by_money: i32,
    pub paid_by_bonuses: i32,
    pub privilege: PrivilegeShort,
}

/// Public purchase response: the enriched ticket plus the payment breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    #[serde(flatten)]
    pub ticket: EnrichedTicket,
    pub paid_by_money: i32,
    pub paid_by_bonuses: i32,
    pub privilege: PrivilegeShort,
}
