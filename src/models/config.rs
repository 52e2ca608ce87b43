//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Cache holding the assembled book set per author.
pub const BOOKS_BY_AUTHOR_CACHE: &str = "getBooksByAuthor";

/// Cache holding the resolved publication year per ISBN set.
pub const PUBLISH_YEAR_BY_ISBN_CACHE: &str = "getPublishYearByIsbn";

/// Environment variable overriding `bestsellers.api_key`.
pub const API_KEY_ENV: &str = "NYBOOKS_API_KEY";

/// Placeholder substituted with the ISBN in `publications.url`.
pub const ISBN_PLACEHOLDER: &str = "{isbn}";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Paginated bestseller source
    #[serde(default)]
    pub bestsellers: BestsellersConfig,

    /// Per-ISBN publication lookup source
    #[serde(default)]
    pub publications: PublicationsConfig,

    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Named TTL caches
    #[serde(default = "defaults::caches")]
    pub caches: Vec<CacheSettings>,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env();
        Ok(config)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            let mut config = Self::default();
            config.apply_env();
            config
        })
    }

    /// Apply environment overrides on top of the file values.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.bestsellers.api_key = key;
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.bestsellers.scheme.trim().is_empty() {
            return Err(AppError::config("bestsellers.scheme is empty"));
        }
        if self.bestsellers.host.trim().is_empty() {
            return Err(AppError::config("bestsellers.host is empty"));
        }
        if self.bestsellers.api_key.trim().is_empty() {
            return Err(AppError::config(format!(
                "bestsellers.api_key is empty (set it in the config file or {API_KEY_ENV})"
            )));
        }
        if !self.publications.url.contains(ISBN_PLACEHOLDER) {
            return Err(AppError::config(format!(
                "publications.url must contain {ISBN_PLACEHOLDER}"
            )));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::config("http.timeout_secs must be > 0"));
        }
        for required in [BOOKS_BY_AUTHOR_CACHE, PUBLISH_YEAR_BY_ISBN_CACHE] {
            match self.caches.iter().find(|c| c.name == required) {
                None => {
                    return Err(AppError::config(format!(
                        "cache '{required}' is not configured"
                    )));
                }
                Some(cache) if cache.expiry_minutes == 0 => {
                    return Err(AppError::config(format!(
                        "cache '{required}' must have expiry_minutes > 0"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bestsellers: BestsellersConfig::default(),
            publications: PublicationsConfig::default(),
            http: HttpConfig::default(),
            caches: defaults::caches(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Endpoint of the paginated bestseller history API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestsellersConfig {
    #[serde(default = "defaults::scheme")]
    pub scheme: String,

    #[serde(default = "defaults::bestsellers_host")]
    pub host: String,

    #[serde(default = "defaults::bestsellers_path")]
    pub path: String,

    /// API key sent as the `api-key` query parameter
    #[serde(default)]
    pub api_key: String,
}

impl Default for BestsellersConfig {
    fn default() -> Self {
        Self {
            scheme: defaults::scheme(),
            host: defaults::bestsellers_host(),
            path: defaults::bestsellers_path(),
            api_key: String::new(),
        }
    }
}

/// Endpoint of the per-ISBN publication lookup API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationsConfig {
    /// URL template; `{isbn}` is replaced with the looked-up ISBN
    #[serde(default = "defaults::publications_url")]
    pub url: String,
}

impl Default for PublicationsConfig {
    fn default() -> Self {
        Self {
            url: defaults::publications_url(),
        }
    }
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Connect and read timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// A named cache and how long its entries live after being written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheSettings {
    pub name: String,
    pub expiry_minutes: u64,
}

impl CacheSettings {
    pub fn new(name: impl Into<String>, expiry_minutes: u64) -> Self {
        Self {
            name: name.into(),
            expiry_minutes,
        }
    }
}

/// How much of an error is disclosed to HTTP clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorDetail {
    /// Error category only
    #[default]
    Limited,
    /// Error category and message
    Detailed,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::bind")]
    pub bind: String,

    #[serde(default)]
    pub error_detail: ErrorDetail,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
            error_detail: ErrorDetail::default(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use super::{BOOKS_BY_AUTHOR_CACHE, CacheSettings, PUBLISH_YEAR_BY_ISBN_CACHE};

    // Upstream defaults
    pub fn scheme() -> String {
        "https".into()
    }
    pub fn bestsellers_host() -> String {
        "api.nytimes.com".into()
    }
    pub fn bestsellers_path() -> String {
        "/svc/books/v3/lists/best-sellers/history.json".into()
    }
    pub fn publications_url() -> String {
        "https://openlibrary.org/isbn/{isbn}.json".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; nybooks/0.1)".into()
    }
    pub fn timeout() -> u64 {
        5
    }

    // Cache defaults
    pub fn caches() -> Vec<CacheSettings> {
        vec![
            CacheSettings::new(BOOKS_BY_AUTHOR_CACHE, 60),
            CacheSettings::new(PUBLISH_YEAR_BY_ISBN_CACHE, 24 * 60),
        ]
    }

    // Server defaults
    pub fn bind() -> String {
        "0.0.0.0:8080".into()
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
