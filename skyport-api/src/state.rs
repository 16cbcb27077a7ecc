use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use skyport_infra::app_config::Config;
use skyport_ticketing::AggregationOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: AggregationOrchestrator,
    /// Empty allows any origin.
    pub allowed_origins: Arc<Vec<HeaderValue>>,
}

impl AppState {
    pub fn new(orchestrator: AggregationOrchestrator) -> Self {
        Self {
            orchestrator,
            allowed_origins: Arc::new(Vec::new()),
        }
    }

    /// Wire the HTTP adapters for both backends from loaded configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let allowed_origins = parse_origins(&config.cors.allowed_origins)?;
        let (catalog, ledger) = skyport_infra::connect(&config.backends)?;
        let orchestrator = AggregationOrchestrator::new(Arc::new(catalog), Arc::new(ledger));

        Ok(Self {
            orchestrator,
            allowed_origins: Arc::new(allowed_origins),
        })
    }
}

/// Every configured origin must be a valid header value. One bad entry fails
/// startup rather than silently widening or narrowing CORS.
pub fn parse_origins(origins: &[String]) -> anyhow::Result<Vec<HeaderValue>> {
    origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| {
                tracing::warn!(origin = %origin.escape_debug(), "Rejecting invalid CORS origin");
                format!("Invalid CORS origin {:?}", origin)
            })
        })
        .collect()
}
