// src/pipeline/validate.rs

use crate::cache::CacheRegistry;
use crate::error::Result;
use crate::models::Config;

/// Validate configuration and the cache settings derived from it.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Configuration invalid: {}", e);
        return Err(e);
    }
    let caches = CacheRegistry::build(&config.caches)?;

    log::info!("Configuration OK");
    log::info!(
        "  Bestsellers: {}://{}{}",
        config.bestsellers.scheme,
        config.bestsellers.host,
        config.bestsellers.path
    );
    log::info!("  Publications: {}", config.publications.url);
    log::info!("  Timeout: {}s", config.http.timeout_secs);
    for name in caches.names() {
        if let Some(ttl) = caches.ttl(name) {
            log::info!("  Cache {}: {} min", name, ttl.as_secs() / 60);
        }
    }

    Ok(())
}
