// src/services/search.rs

//! Author search with optional publication year filtering.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Book, SearchRequest};
use crate::services::CatalogService;
use crate::services::catalog::AUTHOR_NAME_CANNOT_BE_EMPTY;

/// Entry point used by the CLI and the HTTP adapter.
#[derive(Clone)]
pub struct SearchService {
    catalog: Arc<CatalogService>,
}

impl SearchService {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }

    /// All books by `author`.
    pub async fn search(&self, author: &str) -> Result<HashSet<Book>> {
        self.catalog.fetch_by_author(author).await
    }

    /// Books by `author` published in one of `years`.
    ///
    /// Plain membership on `book.year`, so [`UNKNOWN_YEAR`](crate::models::UNKNOWN_YEAR)
    /// selects the books whose year could not be resolved. An empty `years`
    /// slice matches nothing.
    pub async fn search_filtered(&self, author: &str, years: &[i32]) -> Result<HashSet<Book>> {
        let books = self.catalog.fetch_by_author(author).await?;
        let filtered: HashSet<Book> = books
            .into_iter()
            .filter(|book| years.contains(&book.year))
            .collect();
        log::debug!(
            "{} books by {} published in {:?}",
            filtered.len(),
            author,
            years
        );
        Ok(filtered)
    }

    /// Dispatch a boundary request.
    ///
    /// Without years (absent or empty) the full author set is returned.
    pub async fn search_request(&self, request: &SearchRequest) -> Result<HashSet<Book>> {
        let Some(author) = request.author.as_deref() else {
            return Err(AppError::validation(AUTHOR_NAME_CANNOT_BE_EMPTY));
        };

        match request.years.as_deref() {
            None | Some([]) => self.search(author).await,
            Some(years) => self.search_filtered(author, years).await,
        }
    }
}
