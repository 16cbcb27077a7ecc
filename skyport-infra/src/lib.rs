pub mod app_config;
pub mod backend;
pub mod catalog;
pub mod ledger;

pub use backend::{BackendClient, BackendConfig, BackendError, BackendRequest};
pub use catalog::HttpFlightCatalog;
pub use ledger::HttpTicketLedger;

use app_config::BackendsConfig;
use skyport_core::Backend;

/// Build both adapters over one shared connection pool.
pub fn connect(config: &BackendsConfig) -> Result<(HttpFlightCatalog, HttpTicketLedger), reqwest::Error> {
    let http = reqwest::Client::builder().timeout(config.timeout()).build()?;

    let catalog = BackendClient::with_client(
        http.clone(),
        BackendConfig::new(Backend::Catalog, &config.catalog_url, config.timeout()),
    );
    let ledger = BackendClient::with_client(
        http,
        BackendConfig::new(Backend::Ledger, &config.ledger_url, config.timeout()),
    );

    Ok((HttpFlightCatalog::new(catalog), HttpTicketLedger::new(ledger)))
}
