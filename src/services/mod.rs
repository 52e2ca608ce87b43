//! Service layer for the book search pipeline.
//!
//! This module contains the business logic for:
//! - Publication year resolution (`PublicationService`)
//! - Bestseller catalog fetching (`CatalogService`)
//! - Author search and year filtering (`SearchService`)
//! - Upstream health probes (`HealthService`)

pub mod catalog;
mod health;
mod publication;
mod search;

use std::sync::Arc;

pub use catalog::CatalogService;
pub use health::{ComponentHealth, HealthReport, HealthService, PROBE_AUTHOR, PROBE_ISBN, Status};
pub use publication::PublicationService;
pub use search::SearchService;

use crate::cache::CacheRegistry;
use crate::error::Result;
use crate::models::Config;
use crate::utils::http::{RestClient, create_async_client};
use crate::utils::timing::{MetricsTimingSink, TimingSink};

/// The wired service graph shared by the CLI and the HTTP server.
#[derive(Clone)]
pub struct Services {
    pub search: SearchService,
    pub health: Arc<HealthService>,
    pub caches: CacheRegistry,
}

impl Services {
    /// Build every service from configuration with the production HTTP client
    /// and timing sink.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client: Arc<dyn RestClient> = Arc::new(create_async_client(&config.http)?);
        Self::with_client(config, client, Arc::new(MetricsTimingSink))
    }

    pub fn with_client(
        config: &Config,
        client: Arc<dyn RestClient>,
        timing: Arc<dyn TimingSink>,
    ) -> Result<Self> {
        let caches = CacheRegistry::build(&config.caches)?;

        let publications = Arc::new(PublicationService::new(
            config.publications.clone(),
            Arc::clone(&client),
            Arc::clone(&timing),
            caches.publish_year_by_isbn().clone(),
        ));
        let catalog = Arc::new(CatalogService::new(
            config.bestsellers.clone(),
            client,
            Arc::clone(&publications),
            timing,
            caches.books_by_author().clone(),
        ));

        log::debug!("Services built with caches {:?}", caches.names());

        Ok(Self {
            search: SearchService::new(Arc::clone(&catalog)),
            health: Arc::new(HealthService::new(catalog, publications)),
            caches,
        })
    }
}
