// src/services/publication.rs

//! Publication year lookup by ISBN.
//!
//! Books on the bestseller lists carry several ISBNs (hardcover, paperback,
//! e-book, ...). Each is tried against the lookup API in turn until one of
//! them reports a usable publication date.

use std::sync::Arc;
use std::time::Instant;

use url::Url;

use crate::cache::PublishYearCache;
use crate::error::{AppError, Result};
use crate::models::external::PublicationResponse;
use crate::models::{ISBN_PLACEHOLDER, IsbnSet, PublicationsConfig, UNKNOWN_YEAR};
use crate::utils::extract_year;
use crate::utils::http::{RestClient, get_json};
use crate::utils::timing::{PUBLICATIONS_API_CALL_DURATION, TimingSink};

/// Resolves publication years through the ISBN lookup API.
pub struct PublicationService {
    config: PublicationsConfig,
    client: Arc<dyn RestClient>,
    timing: Arc<dyn TimingSink>,
    cache: PublishYearCache,
}

impl PublicationService {
    pub fn new(
        config: PublicationsConfig,
        client: Arc<dyn RestClient>,
        timing: Arc<dyn TimingSink>,
        cache: PublishYearCache,
    ) -> Self {
        Self {
            config,
            client,
            timing,
            cache,
        }
    }

    /// Resolve the publication year of a book from its candidate ISBNs.
    ///
    /// Returns [`UNKNOWN_YEAR`] when the set is empty or no candidate yields a
    /// year. Lookup failures never escape this method.
    pub async fn resolve_year(&self, isbns: &IsbnSet) -> i32 {
        if isbns.is_empty() {
            return UNKNOWN_YEAR;
        }

        let lookup = async { Ok(self.first_resolved_year(isbns).await) };
        match self.cache.get_or_try_insert_with(isbns.clone(), lookup).await {
            Ok(year) => year,
            Err(e) => {
                log::warn!("Year lookup for ISBNs {} failed: {}", isbns, e);
                UNKNOWN_YEAR
            }
        }
    }

    async fn first_resolved_year(&self, isbns: &IsbnSet) -> i32 {
        log::info!("Retrieving publication year for ISBNs {}", isbns);

        for isbn in isbns.iter() {
            match self.fetch_year(isbn).await {
                Ok(Some(year)) => {
                    log::debug!("Publication year for ISBN {}: {}", isbn, year);
                    return year;
                }
                Ok(None) => log::debug!("No usable publication date for ISBN {}", isbn),
                Err(e) => log::warn!("Error retrieving publication year for ISBN {}: {}", isbn, e),
            }
        }

        log::info!("No publication year found for ISBNs {}", isbns);
        UNKNOWN_YEAR
    }

    /// Look up a single ISBN, bypassing the cache.
    pub async fn probe(&self, isbn: &str) -> Result<Option<i32>> {
        self.fetch_year(isbn).await
    }

    /// Look up a single ISBN. `Ok(None)` means the record has no usable date.
    async fn fetch_year(&self, isbn: &str) -> Result<Option<i32>> {
        let url = self.lookup_url(isbn)?;

        let started = Instant::now();
        let response = get_json::<PublicationResponse>(self.client.as_ref(), &url).await;
        self.timing
            .record(PUBLICATIONS_API_CALL_DURATION, started.elapsed());

        let publish_date = response?.and_then(|r| r.publish_date).unwrap_or_default();
        let year = extract_year(&publish_date).filter(|year| *year > 0);
        if year.is_none() && !publish_date.is_empty() {
            log::warn!("Year could not be extracted from '{}'", publish_date);
        }
        Ok(year)
    }

    fn lookup_url(&self, isbn: &str) -> Result<Url> {
        let raw = self.config.url.replace(ISBN_PLACEHOLDER, isbn);
        Url::parse(&raw).map_err(|e| AppError::config(format!("invalid lookup URL '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::utils::http::StubClient;
    use crate::utils::timing::RecordingSink;

    const TEMPLATE: &str = "https://openlibrary.example/isbn/{isbn}.json";

    fn lookup(isbn: &str) -> String {
        TEMPLATE.replace(ISBN_PLACEHOLDER, isbn)
    }

    fn service(client: Arc<StubClient>, timing: Arc<RecordingSink>) -> PublicationService {
        PublicationService::new(
            PublicationsConfig {
                url: TEMPLATE.to_string(),
            },
            client,
            timing,
            PublishYearCache::new("getPublishYearByIsbn", Duration::from_secs(60)),
        )
    }

    fn publish_date(date: &str) -> String {
        format!(r#"{{"title": "Ignore", "number_of_pages": 850, "publish_date": "{date}"}}"#)
    }

    #[tokio::test]
    async fn empty_set_resolves_without_requests() {
        let client = Arc::new(StubClient::new());
        let timing = Arc::new(RecordingSink::default());
        let service = service(client.clone(), timing.clone());

        assert_eq!(service.resolve_year(&IsbnSet::new()).await, UNKNOWN_YEAR);
        assert_eq!(client.request_count(), 0);
        assert_eq!(timing.count(PUBLICATIONS_API_CALL_DURATION), 0);
    }

    #[tokio::test]
    async fn publish_date_formats_resolve() {
        let cases = [
            ("2000-01-01", 2000),
            ("1990 Jun", 1990),
            ("2019", 2019),
            ("1/2/2000", 2000),
            ("August 2001", 2001),
            ("", UNKNOWN_YEAR),
            ("abs2000def 12", 2000),
        ];

        for (date, expected) in cases {
            let client = Arc::new(StubClient::new().respond(&lookup("123456789"), publish_date(date)));
            let service = service(client.clone(), Arc::new(RecordingSink::default()));

            let isbns: IsbnSet = ["123456789"].into_iter().collect();
            assert_eq!(service.resolve_year(&isbns).await, expected, "date {date:?}");
            assert_eq!(client.request_count(), 1);
        }
    }

    #[tokio::test]
    async fn missing_publish_date_is_unknown() {
        let client = Arc::new(
            StubClient::new()
                .respond(&lookup("1"), r#"{"title": "No date"}"#)
                .respond(&lookup("2"), r#"{"publish_date": null}"#),
        );
        let service = service(client.clone(), Arc::new(RecordingSink::default()));

        let isbns: IsbnSet = ["1", "2"].into_iter().collect();
        assert_eq!(service.resolve_year(&isbns).await, UNKNOWN_YEAR);
        assert_eq!(client.request_count(), 2);
    }

    #[tokio::test]
    async fn failing_candidate_falls_through_to_next() {
        // Both attempt orders must land on the same answer.
        for (failing, working) in [("9780000000001", "9780000000002"), ("9780000000002", "9780000000001")] {
            let client = Arc::new(
                StubClient::new()
                    .fail(&lookup(failing), "read timed out")
                    .respond(&lookup(working), publish_date("1999")),
            );
            let timing = Arc::new(RecordingSink::default());
            let service = service(client.clone(), timing.clone());

            let isbns: IsbnSet = [failing, working].into_iter().collect();
            assert_eq!(service.resolve_year(&isbns).await, 1999);
            assert!(client.request_count() <= 2);
            assert_eq!(
                timing.count(PUBLICATIONS_API_CALL_DURATION),
                client.request_count()
            );
        }
    }

    #[tokio::test]
    async fn first_resolved_candidate_wins() {
        let client = Arc::new(
            StubClient::new()
                .respond(&lookup("1"), publish_date("1991"))
                .respond(&lookup("2"), publish_date("2005")),
        );
        let service = service(client.clone(), Arc::new(RecordingSink::default()));

        let isbns: IsbnSet = ["2", "1"].into_iter().collect();
        assert_eq!(service.resolve_year(&isbns).await, 1991);
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn malformed_body_is_unresolved() {
        let client = Arc::new(
            StubClient::new()
                .respond(&lookup("1"), "<html>not found</html>")
                .respond(&lookup("2"), "null"),
        );
        let service = service(client.clone(), Arc::new(RecordingSink::default()));

        let isbns: IsbnSet = ["1", "2"].into_iter().collect();
        assert_eq!(service.resolve_year(&isbns).await, UNKNOWN_YEAR);
    }

    #[tokio::test]
    async fn same_set_in_any_order_hits_cache() {
        let client = Arc::new(
            StubClient::new()
                .respond(&lookup("1"), publish_date("2010"))
                .respond(&lookup("2"), publish_date("2011")),
        );
        let service = service(client.clone(), Arc::new(RecordingSink::default()));

        let first: IsbnSet = ["1", "2"].into_iter().collect();
        let second: IsbnSet = ["2", "1"].into_iter().collect();
        assert_eq!(service.resolve_year(&first).await, 2010);
        assert_eq!(service.resolve_year(&second).await, 2010);
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn unknown_year_is_cached_too() {
        let client = Arc::new(StubClient::new());
        let service = service(client.clone(), Arc::new(RecordingSink::default()));

        let isbns: IsbnSet = ["1"].into_iter().collect();
        assert_eq!(service.resolve_year(&isbns).await, UNKNOWN_YEAR);
        assert_eq!(service.resolve_year(&isbns).await, UNKNOWN_YEAR);
        assert_eq!(client.request_count(), 1);
    }
}
