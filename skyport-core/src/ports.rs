use async_trait::async_trait;
use skyport_shared::models::{
    FlightPage, PrivilegeAccount, PrivilegeShort, PurchaseResult, Ticket, ValidatedPurchase,
};
use skyport_shared::CallerIdentity;
use uuid::Uuid;

use crate::{CatalogSnapshot, FlightNumberSet, GatewayResult, PageRequest};

/// Read access to the flight catalog service.
#[async_trait]
pub trait FlightCatalog: Send + Sync {
    /// One page of the schedule, paginated exactly as requested.
    async fn list_flights(&self, page: PageRequest) -> GatewayResult<FlightPage>;

    /// Resolve many flight numbers in a single call. Unknown numbers are
    /// absent from the result rather than an error.
    async fn lookup_by_numbers(&self, numbers: &FlightNumberSet) -> GatewayResult<CatalogSnapshot>;
}

/// Tickets and bonus account of one user, as `GET /v1/me` on the ledger returns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTickets {
    pub tickets: Vec<Ticket>,
    pub privilege: PrivilegeShort,
}

/// The ticket ledger service. Every call is made on behalf of `identity`.
#[async_trait]
pub trait TicketLedger: Send + Sync {
    async fn list_tickets(&self, identity: &CallerIdentity) -> GatewayResult<Vec<Ticket>>;

    /// Fails with `NotFound` when the ticket is absent or owned by someone else.
    async fn get_ticket(&self, identity: &CallerIdentity, ticket_uid: Uuid) -> GatewayResult<Ticket>;

    /// The ledger owns the price split and the balance debit; this only relays.
    async fn purchase(
        &self,
        identity: &CallerIdentity,
        request: &ValidatedPurchase,
    ) -> GatewayResult<PurchaseResult>;

    async fn refund(&self, identity: &CallerIdentity, ticket_uid: Uuid) -> GatewayResult<()>;

    async fn user_info(&self, identity: &CallerIdentity) -> GatewayResult<UserTickets>;

    async fn privilege(&self, identity: &CallerIdentity) -> GatewayResult<PrivilegeAccount>;
}
