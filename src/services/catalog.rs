// src/services/catalog.rs

//! Bestseller catalog fetcher.
//!
//! Walks every page of the bestseller history for an author and turns the
//! entries into [`Book`]s, resolving each book's publication year on the way.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use url::Url;

use crate::cache::BookSetCache;
use crate::error::{AppError, ErrorKind, Result};
use crate::models::external::{BestsellerEntry, BestsellerResponse};
use crate::models::{BestsellersConfig, Book};
use crate::services::PublicationService;
use crate::utils::http::{RestClient, get_json};
use crate::utils::timing::{BESTSELLERS_API_CALL_DURATION, TimingSink};

/// Entries per page of the bestseller API.
pub const PAGE_SIZE: u32 = 20;

pub const AUTHOR_NAME_CANNOT_BE_EMPTY: &str = "Author name cannot be empty";

const AUTHOR: &str = "author";
const OFFSET: &str = "offset";
const API_KEY: &str = "api-key";

/// Service fetching an author's books from the bestseller API.
pub struct CatalogService {
    config: BestsellersConfig,
    client: Arc<dyn RestClient>,
    publications: Arc<PublicationService>,
    timing: Arc<dyn TimingSink>,
    cache: BookSetCache,
}

impl CatalogService {
    pub fn new(
        config: BestsellersConfig,
        client: Arc<dyn RestClient>,
        publications: Arc<PublicationService>,
        timing: Arc<dyn TimingSink>,
        cache: BookSetCache,
    ) -> Self {
        Self {
            config,
            client,
            publications,
            timing,
            cache,
        }
    }

    /// Retrieve every book attributed to `author`.
    ///
    /// Results are cached per author string. Failed page requests are skipped,
    /// so the set may be incomplete when the upstream API misbehaves.
    pub async fn fetch_by_author(&self, author: &str) -> Result<HashSet<Book>> {
        let sanitized = validate_author(author)?;
        log::info!("Retrieving books by author: {}", author);

        let load = self.fetch_all_pages(author, sanitized);
        match self.cache.get_or_try_insert_with(author.to_string(), load).await {
            Err(e) if e.kind() == ErrorKind::Upstream => {
                log::warn!("Bestseller API unavailable for author {}: {}", author, e);
                Ok(HashSet::new())
            }
            result => result,
        }
    }

    /// Request the first page for `author`, bypassing the cache.
    ///
    /// Returns the total number of results the API reports.
    pub async fn probe(&self, author: &str) -> Result<u32> {
        let sanitized = validate_author(author)?;
        let response = self.fetch_page(sanitized, 0).await?;
        Ok(response.map_or(0, |page| page.num_results))
    }

    async fn fetch_all_pages(&self, author: &str, sanitized: &str) -> Result<HashSet<Book>> {
        let mut books = HashSet::new();

        // The first page also reports how many results exist in total.
        let first_page = self.fetch_page(sanitized, 0).await?;
        let Some(first_page) = first_page.filter(|page| page.num_results > 0) else {
            log::info!("No books found for author: {}", author);
            return Ok(books);
        };

        let page_count = first_page.num_results.div_ceil(PAGE_SIZE);
        self.collect_page(first_page, &mut books).await;
        log::debug!("Retrieved {} books for author: {} page 1/{}", books.len(), author, page_count);

        for page in 1..page_count {
            match self.fetch_page(sanitized, page * PAGE_SIZE).await {
                Ok(Some(response)) => self.collect_page(response, &mut books).await,
                Ok(None) => log::warn!("Empty page {} for author: {}", page + 1, author),
                Err(e) => log::warn!("Failed to fetch page {} for author {}: {}", page + 1, author, e),
            }
            log::debug!(
                "Retrieved {} books for author: {} page {}/{}",
                books.len(),
                author,
                page + 1,
                page_count
            );
        }

        log::info!("Retrieved {} books for author: {}", books.len(), author);
        Ok(books)
    }

    async fn fetch_page(&self, sanitized: &str, offset: u32) -> Result<Option<BestsellerResponse>> {
        let url = self.page_url(sanitized, offset)?;

        let started = Instant::now();
        let response = get_json::<BestsellerResponse>(self.client.as_ref(), &url).await;
        self.timing
            .record(BESTSELLERS_API_CALL_DURATION, started.elapsed());

        response.map_err(|e| match e {
            AppError::Json(e) => AppError::upstream(format!("offset {offset}"), e),
            other => other,
        })
    }

    async fn collect_page(&self, response: BestsellerResponse, books: &mut HashSet<Book>) {
        for entry in response.results.into_iter().flatten() {
            let book = self.to_book(entry).await;
            books.insert(book);
        }
    }

    async fn to_book(&self, entry: BestsellerEntry) -> Book {
        let year = self.publications.resolve_year(&entry.isbn_candidates()).await;
        Book::new(entry.title, entry.publisher, entry.author, year)
    }

    /// Build the page URL; the author is form-encoded by the query serializer.
    fn page_url(&self, sanitized: &str, offset: u32) -> Result<Url> {
        let base = format!(
            "{}://{}/{}",
            self.config.scheme,
            self.config.host,
            self.config.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&base)
            .map_err(|e| AppError::config(format!("invalid bestseller URL '{base}': {e}")))?;
        url.query_pairs_mut()
            .append_pair(AUTHOR, sanitized)
            .append_pair(OFFSET, &offset.to_string())
            .append_pair(API_KEY, &self.config.api_key);
        Ok(url)
    }
}

/// Reject blank author names, returning the trimmed name.
pub fn validate_author(author: &str) -> Result<&str> {
    let trimmed = author.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(AUTHOR_NAME_CANNOT_BE_EMPTY));
    }
    Ok(trimmed)
}
