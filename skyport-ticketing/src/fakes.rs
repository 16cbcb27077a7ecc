//! In-memory stand-ins for the catalog and ledger services.
//!
//! Both count the calls they receive so tests can assert on batching and on
//! requests that must be rejected before any backend is touched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use skyport_core::{
    Backend, CatalogSnapshot, FlightCatalog, FlightNumberSet, GatewayError, GatewayResult,
    PageRequest, TicketLedger, UserTickets,
};
use skyport_shared::models::{
    FlightPage, FlightSummary, PrivilegeAccount, PrivilegeShort, PrivilegeStatus, PurchaseResult,
    Ticket, TicketStatus, ValidatedPurchase,
};
use skyport_shared::CallerIdentity;
use uuid::Uuid;

fn unavailable(backend: Backend) -> GatewayError {
    GatewayError::BackendUnavailable {
        backend,
        reason: "connection refused".to_string(),
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    flights: Vec<FlightSummary>,
    down: bool,
    list_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
    last_lookup: Mutex<Option<FlightNumberSet>>,
}

impl FakeCatalog {
    pub fn with_flights(flights: Vec<FlightSummary>) -> Self {
        Self {
            flights,
            ..Default::default()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            down: true,
            ..Default::default()
        }
    }

    /// A flight with a route derived from its number.
    pub fn flight(flight_number: &str, price: i32) -> FlightSummary {
        FlightSummary {
            flight_number: flight_number.to_string(),
            from_airport: format!("{} origin", flight_number),
            to_airport: format!("{} destination", flight_number),
            date: "2021-10-08 20:00".to_string(),
            price,
        }
    }

    pub fn calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst) + self.lookups()
    }

    pub fn lookups(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn last_lookup(&self) -> Option<FlightNumberSet> {
        self.last_lookup.lock().ok().and_then(|l| l.clone())
    }
}

#[async_trait]
impl FlightCatalog for FakeCatalog {
    async fn list_flights(&self, page: PageRequest) -> GatewayResult<FlightPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            return Err(unavailable(Backend::Catalog));
        }

        let offset = (page.page as usize).saturating_sub(1) * page.size as usize;
        Ok(FlightPage {
            page: page.page,
            page_size: page.size,
            total_elements: self.flights.len() as u64,
            items: self
                .flights
                .iter()
                .skip(offset)
                .take(page.size as usize)
                .cloned()
                .collect(),
        })
    }

    async fn lookup_by_numbers(&self, numbers: &FlightNumberSet) -> GatewayResult<CatalogSnapshot> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_lookup.lock() {
            *last = Some(numbers.clone());
        }
        if self.down {
            return Err(unavailable(Backend::Catalog));
        }

        Ok(self
            .flights
            .iter()
            .filter(|f| numbers.contains(&f.flight_number))
            .map(|f| (f.flight_number.clone(), f.clone()))
            .collect())
    }
}

pub struct FakeLedger {
    tickets: Mutex<Vec<(String, Ticket)>>,
    balance: Mutex<i32>,
    status: PrivilegeStatus,
    down: bool,
    calls: AtomicUsize,
}

impl Default for FakeLedger {
    fn default() -> Self {
        Self {
            tickets: Mutex::new(Vec::new()),
            balance: Mutex::new(0),
            status: PrivilegeStatus::Bronze,
            down: false,
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            down: true,
            ..Default::default()
        }
    }

    /// Seed a ticket owned by `owner`.
    pub fn with_ticket(self, owner: &str, ticket: Ticket) -> Self {
        if let Ok(mut tickets) = self.tickets.lock() {
            tickets.push((owner.to_string(), ticket));
        }
        self
    }

    pub fn with_balance(self, balance: i32) -> Self {
        if let Ok(mut b) = self.balance.lock() {
            *b = balance;
        }
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> GatewayResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down {
            Err(unavailable(Backend::Ledger))
        } else {
            Ok(())
        }
    }

    fn owned_by(&self, identity: &CallerIdentity) -> Vec<Ticket> {
        self.tickets
            .lock()
            .map(|tickets| {
                tickets
                    .iter()
                    .filter(|(owner, _)| owner == identity.as_str())
                    .map(|(_, t)| t.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn short(&self) -> PrivilegeShort {
        PrivilegeShort {
            balance: self.balance.lock().map(|b| b.to_string()).unwrap_or_default(),
            status: self.status,
        }
    }
}

#[async_trait]
impl TicketLedger for FakeLedger {
    async fn list_tickets(&self, identity: &CallerIdentity) -> GatewayResult<Vec<Ticket>> {
        self.enter()?;
        Ok(self.owned_by(identity))
    }

    async fn get_ticket(&self, identity: &CallerIdentity, ticket_uid: Uuid) -> GatewayResult<Ticket> {
        self.enter()?;
        self.owned_by(identity)
            .into_iter()
            .find(|t| t.ticket_uid == ticket_uid)
            .ok_or_else(|| GatewayError::not_found(format!("Ticket {} not found", ticket_uid)))
    }

    async fn purchase(
        &self,
        identity: &CallerIdentity,
        request: &ValidatedPurchase,
    ) -> GatewayResult<PurchaseResult> {
        self.enter()?;

        let price = request.price();
        let paid_by_bonuses = match self.balance.lock() {
            Ok(mut balance) if request.paid_from_balance() => {
                let used = (*balance).min(price);
                *balance -= used;
                used
            }
            Ok(mut balance) => {
                *balance += price / 10;
                0
            }
            Err(_) => 0,
        };

        let ticket = Ticket {
            ticket_uid: Uuid::new_v4(),
            flight_number: request.flight_number().to_string(),
            price,
            status: TicketStatus::Paid,
        };
        if let Ok(mut tickets) = self.tickets.lock() {
            tickets.push((identity.as_str().to_string(), ticket.clone()));
        }

        Ok(PurchaseResult {
            ticket,
            paid_by_money: price - paid_by_bonuses,
            paid_by_bonuses,
            privilege: self.short(),
        })
    }

    async fn refund(&self, identity: &CallerIdentity, ticket_uid: Uuid) -> GatewayResult<()> {
        self.enter()?;
        let mut tickets = self
            .tickets
            .lock()
            .map_err(|_| unavailable(Backend::Ledger))?;

        match tickets
            .iter_mut()
            .find(|(owner, t)| owner == identity.as_str() && t.ticket_uid == ticket_uid)
        {
            Some((_, t)) => {
                t.status = TicketStatus::Canceled;
                Ok(())
            }
            None => Err(GatewayError::not_found(format!("Ticket {} not found", ticket_uid))),
        }
    }

    async fn user_info(&self, identity: &CallerIdentity) -> GatewayResult<UserTickets> {
        self.enter()?;
        Ok(UserTickets {
            tickets: self.owned_by(identity),
            privilege: self.short(),
        })
    }

    async fn privilege(&self, _identity: &CallerIdentity) -> GatewayResult<PrivilegeAccount> {
        self.enter()?;
        let short = self.short();
        Ok(PrivilegeAccount {
            balance: short.balance,
            status: short.status,
            history: Vec::new(),
        })
    }
}
