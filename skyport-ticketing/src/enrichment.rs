use skyport_core::{CatalogSnapshot, FlightNumberSet};
use skyport_shared::models::{EnrichedTicket, Ticket};

/// Stage one output: the flight numbers a batch of tickets refers to.
pub fn collect_flight_numbers(tickets: &[Ticket]) -> FlightNumberSet {
    tickets.iter().map(|t| t.flight_number.as_str()).collect()
}

/// Join tickets with catalog data by flight number.
///
/// Order is preserved and nothing is dropped: a ticket without a catalog
/// match comes back with empty route fields.
pub fn enrich(tickets: Vec<Ticket>, catalog: &CatalogSnapshot) -> Vec<EnrichedTicket> {
    tickets
        .into_iter()
        .map(|ticket| {
            let flight = catalog.get(&ticket.flight_number);
            EnrichedTicket::join(ticket, flight)
        })
        .collect()
}
