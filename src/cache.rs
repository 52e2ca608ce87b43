// src/cache.rs

//! Named TTL caches shared by the search services.
//!
//! Entries expire a fixed time after they were written, independent of how
//! often they are read, and there is no capacity-based eviction. Loads through
//! [`TtlCache::get_or_try_insert_with`] are coalesced per key: concurrent
//! misses on the same key run a single loader and share its outcome.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;

use moka::future::Cache;

use crate::error::{AppError, Result};
use crate::models::{
    BOOKS_BY_AUTHOR_CACHE, Book, CacheSettings, IsbnSet, PUBLISH_YEAR_BY_ISBN_CACHE,
};

/// Cached result set of one author search.
pub type BookSetCache = TtlCache<String, std::collections::HashSet<Book>>;

/// Cached publication year of one ISBN candidate set.
pub type PublishYearCache = TtlCache<IsbnSet, i32>;

/// A single named cache with expire-after-write semantics.
#[derive(Clone)]
pub struct TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    name: String,
    ttl: Duration,
    inner: Cache<K, V>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache whose entries live for `ttl` after insertion.
    pub fn new(name: impl Into<String>, ttl: Duration) -> Self {
        let name = name.into();
        let inner = Cache::builder().name(&name).time_to_live(ttl).build();
        Self { name, ttl, inner }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await
    }

    /// Store `value` under `key`, restarting its expiry clock.
    pub async fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value).await;
    }

    /// Return the live entry for `key`, or run `init` and store its value.
    ///
    /// Only one `init` runs per key at a time; callers that miss while a load
    /// is in flight wait for it. Errors are returned to every waiting caller
    /// and nothing is stored.
    pub async fn get_or_try_insert_with<F>(&self, key: K, init: F) -> Result<V>
    where
        F: Future<Output = Result<V>>,
    {
        self.inner
            .try_get_with(key, init)
            .await
            .map_err(AppError::from)
    }

    /// Number of live entries, after pending expirations are applied.
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

/// The process-wide set of caches, built once at startup.
///
/// The registry is immutable after [`CacheRegistry::build`]; services receive
/// the typed handles they need.
#[derive(Clone)]
pub struct CacheRegistry {
    expiries: HashMap<String, Duration>,
    books_by_author: BookSetCache,
    publish_year_by_isbn: PublishYearCache,
}

impl CacheRegistry {
    /// Build every cache from its `(name, expiry_minutes)` settings.
    pub fn build(settings: &[CacheSettings]) -> Result<Self> {
        let expiries = settings
            .iter()
            .map(|s| (s.name.clone(), Duration::from_secs(s.expiry_minutes * 60)))
            .collect::<HashMap<_, _>>();

        let books_by_author = TtlCache::new(
            BOOKS_BY_AUTHOR_CACHE,
            Self::expiry(&expiries, BOOKS_BY_AUTHOR_CACHE)?,
        );
        let publish_year_by_isbn = TtlCache::new(
            PUBLISH_YEAR_BY_ISBN_CACHE,
            Self::expiry(&expiries, PUBLISH_YEAR_BY_ISBN_CACHE)?,
        );

        for (name, ttl) in [
            (books_by_author.name(), books_by_author.ttl()),
            (publish_year_by_isbn.name(), publish_year_by_isbn.ttl()),
        ] {
            log::debug!("Cache {} expires entries after {:?}", name, ttl);
        }

        Ok(Self {
            expiries,
            books_by_author,
            publish_year_by_isbn,
        })
    }

    fn expiry(expiries: &HashMap<String, Duration>, name: &str) -> Result<Duration> {
        match expiries.get(name) {
            Some(ttl) if !ttl.is_zero() => Ok(*ttl),
            Some(_) => Err(AppError::config(format!(
                "cache '{name}' must have a positive expiry"
            ))),
            None => Err(AppError::config(format!("cache '{name}' is not configured"))),
        }
    }

    /// Configured expiry of a named cache.
    pub fn ttl(&self, name: &str) -> Option<Duration> {
        self.expiries.get(name).copied()
    }

    /// Names of all configured caches, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.expiries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn books_by_author(&self) -> &BookSetCache {
        &self.books_by_author
    }

    pub fn publish_year_by_isbn(&self) -> &PublishYearCache {
        &self.publish_year_by_isbn
    }
}
