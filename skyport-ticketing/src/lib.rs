pub mod enrichment;
pub mod orchestrator;
pub mod purchase;

#[cfg(any(test, feature = "test-support"))]
pub mod fakes;

pub use enrichment::{collect_flight_numbers, enrich};
pub use orchestrator::{AggregationOrchestrator, EnrichmentPolicy};
pub use purchase::PurchaseStage;
