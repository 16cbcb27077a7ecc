use std::fmt;

use skyport_core::{FlightCatalog, FlightNumberSet, GatewayError, GatewayResult, TicketLedger};
use skyport_shared::models::{EnrichedTicket, FieldError, PurchaseRequest, PurchaseResponse};
use skyport_shared::CallerIdentity;

/// Where a purchase is in its lifecycle. There is no rollback state: nothing
/// is committed gateway-side, so a failed ledger call needs no compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStage {
    Received,
    Validated,
    FlightResolved,
    LedgerCallIssued,
    Succeeded,
    ValidationRejected,
    CatalogError,
    LedgerError,
}

impl fmt::Display for PurchaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PurchaseStage::Received => "received",
            PurchaseStage::Validated => "validated",
            PurchaseStage::FlightResolved => "flight-resolved",
            PurchaseStage::LedgerCallIssued => "ledger-call-issued",
            PurchaseStage::Succeeded => "succeeded",
            PurchaseStage::ValidationRejected => "validation-rejected",
            PurchaseStage::CatalogError => "catalog-error",
            PurchaseStage::LedgerError => "ledger-error",
        };
        write!(f, "{}", name)
    }
}

impl PurchaseStage {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PurchaseStage::Succeeded
                | PurchaseStage::ValidationRejected
                | PurchaseStage::CatalogError
                | PurchaseStage::LedgerError
        )
    }
}

/// Drives one purchase through its stages and remembers the last one reached.
pub(crate) struct PurchaseFlow<'a> {
    catalog: &'a dyn FlightCatalog,
    ledger: &'a dyn TicketLedger,
    stage: PurchaseStage,
}

impl<'a> PurchaseFlow<'a> {
    pub(crate) fn new(catalog: &'a dyn FlightCatalog, ledger: &'a dyn TicketLedger) -> Self {
        Self {
            catalog,
            ledger,
            stage: PurchaseStage::Received,
        }
    }

    pub(crate) fn stage(&self) -> PurchaseStage {
        self.stage
    }

    fn advance(&mut self, next: PurchaseStage) {
        tracing::debug!(from = %self.stage, to = %next, "Purchase stage change");
        self.stage = next;
    }

    pub(crate) async fn run(
        &mut self,
        identity: &CallerIdentity,
        request: PurchaseRequest,
    ) -> GatewayResult<PurchaseResponse> {
        let purchase = match request.validate() {
            Ok(p) => p,
            Err(errors) => {
                self.advance(PurchaseStage::ValidationRejected);
                return Err(GatewayError::validation("Invalid purchase request", errors));
            }
        };
        self.advance(PurchaseStage::Validated);

        // The flight must exist before the ledger is asked to sell a seat on it.
        let numbers: FlightNumberSet = std::iter::once(purchase.flight_number()).collect();
        let snapshot = match self.catalog.lookup_by_numbers(&numbers).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.advance(PurchaseStage::CatalogError);
                return Err(e);
            }
        };
        if !snapshot.contains_key(purchase.flight_number()) {
            self.advance(PurchaseStage::ValidationRejected);
            return Err(GatewayError::validation(
                "Invalid purchase request",
                vec![FieldError::new("flightNumber", "flight not found")],
            ));
        }
        self.advance(PurchaseStage::FlightResolved);

        self.advance(PurchaseStage::LedgerCallIssued);
        let result = match self.ledger.purchase(identity, &purchase).await {
            Ok(r) => r,
            Err(e) => {
                let next = match e {
                    GatewayError::ValidationFailed { .. } => PurchaseStage::ValidationRejected,
                    _ => PurchaseStage::LedgerError,
                };
                self.advance(next);
                return Err(e);
            }
        };
        self.advance(PurchaseStage::Succeeded);

        let flight = snapshot.get(&result.ticket.flight_number);
        Ok(PurchaseResponse {
            ticket: EnrichedTicket::join(result.ticket, flight),
            paid_by_money: result.paid_by_money,
            paid_by_bonuses: result.paid_by_bonuses,
            privilege: result.privilege,
        })
    }
}
