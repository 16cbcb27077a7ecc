use async_trait::async_trait;
use serde::Deserialize;
use skyport_core::{CatalogSnapshot, FlightCatalog, FlightNumberSet, GatewayResult, PageRequest};
use skyport_shared::models::{FlightPage, FlightSummary};

use crate::backend::{BackendClient, BackendRequest};

/// Flight as the catalog service renders it. Older catalog builds used
/// snake_case and different field names, both are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFlightDto {
    #[serde(alias = "flight_number")]
    flight_number: String,
    #[serde(alias = "from", alias = "from_airport")]
    from_airport: String,
    #[serde(alias = "to", alias = "to_airport")]
    to_airport: String,
    #[serde(alias = "departure_time")]
    date: String,
    #[serde(alias = "cost")]
    price: i32,
}

impl From<CatalogFlightDto> for FlightSummary {
    fn from(dto: CatalogFlightDto) -> Self {
        FlightSummary {
            flight_number: dto.flight_number,
            from_airport: dto.from_airport,
            to_airport: dto.to_airport,
            date: dto.date,
            price: dto.price,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogPageDto {
    current_page: u32,
    page_size: u32,
    total_elements: u64,
    #[serde(default)]
    results: Vec<CatalogFlightDto>,
}

pub struct HttpFlightCatalog {
    client: BackendClient,
}

impl HttpFlightCatalog {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FlightCatalog for HttpFlightCatalog {
    async fn list_flights(&self, page: PageRequest) -> GatewayResult<FlightPage> {
        let request = BackendRequest::get("/flights")
            .query("page", page.page)
            .query("size", page.size);

        let dto: CatalogPageDto = self
            .client
            .fetch(request)
            .await
            .map_err(|e| e.into_gateway(self.client.backend()))?;

        Ok(FlightPage {
            page: dto.current_page,
            page_size: dto.page_size,
            total_elements: dto.total_elements,
            items: dto.results.into_iter().map(FlightSummary::from).collect(),
        })
    }

    async fn lookup_by_numbers(&self, numbers: &FlightNumberSet) -> GatewayResult<CatalogSnapshot> {
        if numbers.is_empty() {
            return Ok(CatalogSnapshot::new());
        }

        let request = numbers
            .iter()
            .fold(BackendRequest::get("/flights-by-number"), |req, n| {
                req.query("flightNumber", n)
            });

        let flights: Vec<CatalogFlightDto> = self
            .client
            .fetch(request)
            .await
            .map_err(|e| e.into_gateway(self.client.backend()))?;

        tracing::debug!(
            requested = numbers.len(),
            found = flights.len(),
            "Resolved flight numbers"
        );

        // The catalog may answer with numbers we did not ask for; keep only ours.
        Ok(flights
            .into_iter()
            .filter(|f| numbers.contains(&f.flight_number))
            .map(|f| (f.flight_number.clone(), FlightSummary::from(f)))
            .collect())
    }
}
