use serde::{Deserialize, Serialize};

/// Route, departure time and price of one scheduled flight, as published by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSummary {
    pub flight_number: String,
    pub from_airport: String,
    pub to_airport: String,
    /// Departure time as rendered by the catalog.
    pub date: String,
    pub price: i32,
}

/// One page of the flight listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPage {
    pub page: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub items: Vec<FlightSummary>,
}
