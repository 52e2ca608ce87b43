// src/services/health.rs

//! Reachability checks for the two upstream APIs.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::{CatalogService, PublicationService};

/// Author queried by the bestseller probe.
pub const PROBE_AUTHOR: &str = "James Carville";

/// ISBN queried by the lookup probe.
pub const PROBE_ISBN: &str = "9780684857343";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Up,
    Down,
}

/// Outcome of one probe.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub status: Status,
    pub message: String,
}

impl ComponentHealth {
    fn up(message: impl Into<String>) -> Self {
        Self {
            status: Status::Up,
            message: message.into(),
        }
    }

    fn down(message: impl Into<String>) -> Self {
        Self {
            status: Status::Down,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: Status,
    pub checked_at: DateTime<Utc>,
    pub components: BTreeMap<&'static str, ComponentHealth>,
}

impl HealthReport {
    pub fn is_up(&self) -> bool {
        self.status == Status::Up
    }
}

pub struct HealthService {
    catalog: Arc<CatalogService>,
    publications: Arc<PublicationService>,
}

impl HealthService {
    pub fn new(catalog: Arc<CatalogService>, publications: Arc<PublicationService>) -> Self {
        Self {
            catalog,
            publications,
        }
    }

    /// Probe both upstream APIs. Probes bypass the caches.
    pub async fn check(&self) -> HealthReport {
        let bestsellers = match self.catalog.probe(PROBE_AUTHOR).await {
            Ok(count) => ComponentHealth::up(format!("{count} results for {PROBE_AUTHOR}")),
            Err(e) => {
                log::warn!("Bestseller API health check failed: {}", e);
                ComponentHealth::down(e.to_string())
            }
        };

        let publications = match self.publications.probe(PROBE_ISBN).await {
            Ok(Some(year)) => ComponentHealth::up(format!("ISBN {PROBE_ISBN} published in {year}")),
            Ok(None) => ComponentHealth::up(format!("ISBN {PROBE_ISBN} has no publication year")),
            Err(e) => {
                log::warn!("Publication API health check failed: {}", e);
                ComponentHealth::down(e.to_string())
            }
        };

        let status = if bestsellers.status == Status::Up && publications.status == Status::Up {
            Status::Up
        } else {
            Status::Down
        };

        HealthReport {
            status,
            checked_at: Utc::now(),
            components: BTreeMap::from([("bestsellers", bestsellers), ("publications", publications)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cache::{BookSetCache, PublishYearCache};
    use crate::models::{BestsellersConfig, PublicationsConfig};
    use crate::utils::http::StubClient;
    use crate::utils::timing::RecordingSink;

    const PAGE: &str = "https://books.example/lists?author=James+Carville&offset=0&api-key=k";
    const LOOKUP: &str = "https://lookup.example/9780684857343.json";

    fn health(client: StubClient) -> HealthService {
        let client = Arc::new(client);
        let timing = Arc::new(RecordingSink::default());
        let publications = Arc::new(PublicationService::new(
            PublicationsConfig {
                url: "https://lookup.example/{isbn}.json".to_string(),
            },
            client.clone(),
            timing.clone(),
            PublishYearCache::new("getPublishYearByIsbn", Duration::from_secs(60)),
        ));
        let catalog = Arc::new(CatalogService::new(
            BestsellersConfig {
                scheme: "https".to_string(),
                host: "books.example".to_string(),
                path: "/lists".to_string(),
                api_key: "k".to_string(),
            },
            client,
            publications.clone(),
            timing,
            BookSetCache::new("getBooksByAuthor", Duration::from_secs(60)),
        ));
        HealthService::new(catalog, publications)
    }

    #[tokio::test]
    async fn both_probes_up() {
        let service = health(
            StubClient::new()
                .respond(PAGE, r#"{"num_results": 2, "results": []}"#)
                .respond(LOOKUP, r#"{"publish_date": "1999"}"#),
        );

        let report = service.check().await;
        assert!(report.is_up());
        assert_eq!(report.components["bestsellers"].status, Status::Up);
        assert!(report.components["publications"].message.contains("1999"));
    }

    #[tokio::test]
    async fn one_probe_down_is_overall_down() {
        let service = health(StubClient::new().respond(PAGE, r#"{"num_results": 2}"#));

        let report = service.check().await;
        assert_eq!(report.status, Status::Down);
        assert_eq!(report.components["bestsellers"].status, Status::Up);
        assert_eq!(report.components["publications"].status, Status::Down);
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Status::Down).unwrap(), r#""DOWN""#);
    }
}
