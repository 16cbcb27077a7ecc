use std::sync::Arc;

use skyport_core::{FlightCatalog, GatewayError, GatewayResult, PageRequest, TicketLedger};
use skyport_shared::models::{
    EnrichedTicket, FlightPage, PrivilegeAccount, PurchaseRequest, PurchaseResponse, Ticket,
    UserInfo,
};
use skyport_shared::CallerIdentity;
use tracing::instrument;
use uuid::Uuid;

use crate::enrichment::{collect_flight_numbers, enrich};
use crate::purchase::PurchaseFlow;

/// What to do when the catalog lookup behind an enrichment fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnrichmentPolicy {
    /// Propagate the catalog error and fail the whole request.
    #[default]
    FailRequest,
}

/// Combines ledger and catalog results for the public endpoints.
///
/// Cheap to clone; holds no per-request state.
#[derive(Clone)]
pub struct AggregationOrchestrator {
    catalog: Arc<dyn FlightCatalog>,
    ledger: Arc<dyn TicketLedger>,
    policy: EnrichmentPolicy,
}

impl AggregationOrchestrator {
    pub fn new(catalog: Arc<dyn FlightCatalog>, ledger: Arc<dyn TicketLedger>) -> Self {
        Self {
            catalog,
            ledger,
            policy: EnrichmentPolicy::default(),
        }
    }

    pub fn policy(&self) -> EnrichmentPolicy {
        self.policy
    }

    /// Catalog listing. The page number and size in the answer are the ones
    /// that were asked for, and never more than `size` items come back.
    #[instrument(skip(self))]
    pub async fn list_flights(&self, page: PageRequest) -> GatewayResult<FlightPage> {
        let mut listing = self.catalog.list_flights(page).await?;

        listing.page = page.page;
        listing.page_size = page.size;
        listing.items.truncate(page.size as usize);
        Ok(listing)
    }

    #[instrument(skip(self, identity), fields(caller = %identity))]
    pub async fn list_tickets(&self, identity: &CallerIdentity) -> GatewayResult<Vec<EnrichedTicket>> {
        let tickets = self.ledger.list_tickets(identity).await?;
        self.enrich_tickets(tickets).await
    }

    #[instrument(skip(self, identity), fields(caller = %identity))]
    pub async fn get_ticket(
        &self,
        identity: &CallerIdentity,
        ticket_uid: Uuid,
    ) -> GatewayResult<EnrichedTicket> {
        let ticket = self.ledger.get_ticket(identity, ticket_uid).await?;
        self.enrich_tickets(vec![ticket])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::not_found(format!("Ticket {} not found", ticket_uid)))
    }

    #[instrument(skip(self, identity), fields(caller = %identity))]
    pub async fn user_info(&self, identity: &CallerIdentity) -> GatewayResult<UserInfo> {
        let info = self.ledger.user_info(identity).await?;
        let tickets = self.enrich_tickets(info.tickets).await?;
        Ok(UserInfo {
            tickets,
            privilege: info.privilege,
        })
    }

    #[instrument(skip(self, identity, request), fields(caller = %identity, flight = %request.flight_number))]
    pub async fn purchase(
        &self,
        identity: &CallerIdentity,
        request: PurchaseRequest,
    ) -> GatewayResult<PurchaseResponse> {
        let mut flow = PurchaseFlow::new(self.catalog.as_ref(), self.ledger.as_ref());
        let outcome = flow.run(identity, request).await;
        tracing::info!(stage = %flow.stage(), "Purchase finished");
        outcome
    }

    #[instrument(skip(self, identity), fields(caller = %identity))]
    pub async fn refund(&self, identity: &CallerIdentity, ticket_uid: Uuid) -> GatewayResult<()> {
        self.ledger.refund(identity, ticket_uid).await
    }

    #[instrument(skip(self, identity), fields(caller = %identity))]
    pub async fn privilege(&self, identity: &CallerIdentity) -> GatewayResult<PrivilegeAccount> {
        self.ledger.privilege(identity).await
    }

    /// Second stage of every ticket aggregation: one batched catalog lookup
    /// for the distinct flight numbers, then the pure join.
    async fn enrich_tickets(&self, tickets: Vec<Ticket>) -> GatewayResult<Vec<EnrichedTicket>> {
        let numbers = collect_flight_numbers(&tickets);
        if numbers.is_empty() {
            return Ok(Vec::new());
        }

        let snapshot = match self.catalog.lookup_by_numbers(&numbers).await {
            Ok(snapshot) => snapshot,
            Err(e) => match self.policy {
                EnrichmentPolicy::FailRequest => {
                    tracing::warn!("Enrichment lookup failed, failing request: {}", e);
                    return Err(e);
                }
            },
        };

        tracing::debug!(
            tickets = tickets.len(),
            flights = numbers.len(),
            matched = snapshot.len(),
            "Enriching tickets"
        );
        Ok(enrich(tickets, &snapshot))
    }
}
