// src/models/mod.rs

//! Domain models for the book search pipeline.
//!
//! This module contains the data structures used throughout the application,
//! organized by their primary purpose.

mod book;
mod config;
pub mod external;

// Re-export all public types
pub use book::{Book, IsbnSet, UNKNOWN_YEAR};
pub use config::{
    API_KEY_ENV, BOOKS_BY_AUTHOR_CACHE, BestsellersConfig, CacheSettings, Config, ErrorDetail,
    HttpConfig, ISBN_PLACEHOLDER, LoggingConfig, PUBLISH_YEAR_BY_ISBN_CACHE, PublicationsConfig,
    ServerConfig,
};

use serde::Deserialize;

/// A search as received from a boundary adapter.
///
/// Both fields are optional on the wire; a missing author is rejected by the
/// pipeline the same way a blank one is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub author: Option<String>,

    #[serde(default, alias = "year")]
    pub years: Option<Vec<i32>>,
}

impl SearchRequest {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            years: None,
        }
    }

    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = Some(years);
        self
    }
}
