//! Proxy selection with optional bounded-retry validation.

use crate::config::ProxyPoolConfig;
use crate::error::{LoadError, SelectError};
use crate::picker::{Picker, RandomPicker};
use crate::pool::ProxyPool;
use crate::source;
use crate::validator::{HttpValidator, Validator};

use log::{debug, info, warn};
use std::sync::Arc;

/// Extra candidates tried after the first one fails validation.
pub const VALIDATION_RETRIES: usize = 3;

/// Hands out proxies from a pool, optionally checking them first.
pub struct ProxySelector {
    pool: Arc<ProxyPool>,
    validator: Arc<dyn Validator>,
}

impl ProxySelector {
    /// Create a selector over `pool` that checks liveness with `validator`.
    pub fn new(pool: Arc<ProxyPool>, validator: Arc<dyn Validator>) -> Self {
        Self { pool, validator }
    }

    /// Load the pool described by `config` and wire a selector around it.
    pub async fn from_config(config: &ProxyPoolConfig) -> Arc<Self> {
        let picker: Box<dyn Picker> = match config.seed {
            Some(seed) => Box::new(RandomPicker::seeded(seed)),
            None => Box::new(RandomPicker::from_os_rng()),
        };
        let pool = ProxyPool::new(
            source::source_for(&config.source),
            picker,
            config.default_proxies.clone(),
        )
        .await;
        info!("Proxy pool ready with {} proxies", pool.len());

        Arc::new(Self::new(pool, Arc::new(HttpValidator::from_config(config))))
    }

    /// The underlying pool.
    pub fn pool(&self) -> &Arc<ProxyPool> {
        &self.pool
    }

    /// Get a proxy, validating it first when `require_validation` is set.
    ///
    /// A failed candidate is replaced by a different one, up to
    /// `VALIDATION_RETRIES` times. An empty pool fails immediately and is
    /// never retried.
    pub async fn get_proxy(&self, require_validation: bool) -> Result<String, SelectError> {
        if !require_validation {
            return self.pool.pick_random();
        }

        let mut tried: Vec<String> = Vec::with_capacity(VALIDATION_RETRIES + 1);
        while tried.len() <= VALIDATION_RETRIES {
            let proxy = match self.pool.pick_random_excluding(&tried)? {
                Some(proxy) => proxy,
                None => {
                    debug!("Every proxy in the pool failed validation");
                    break;
                }
            };

            if self.validator.is_live(&proxy).await {
                debug!("Proxy {} passed validation (attempt {})", proxy, tried.len() + 1);
                return Ok(proxy);
            }
            warn!("Proxy {} failed validation (attempt {})", proxy, tried.len() + 1);
            tried.push(proxy);
        }

        warn!("No live proxy found after {} attempts", tried.len());
        Err(SelectError::ValidationFailed)
    }

    /// Reload the pool from its source. The pool is unchanged on error.
    pub async fn reload(&self) -> Result<usize, LoadError> {
        match self.pool.reload().await {
            Ok(count) => {
                info!("Reloaded {} proxies", count);
                Ok(count)
            }
            Err(e) => {
                warn!("Failed to reload proxies: {}", e);
                Err(e)
            }
        }
    }
}

/// Interpret a `validate` query parameter.
///
/// Accepts the usual spellings of true and false; anything else, including a
/// missing value, means no validation.
pub fn parse_validate_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "t" | "T" | "true" | "TRUE" | "True"))
}
