//! Core proxy pool implementation.

use crate::error::{LoadError, SelectError};
use crate::picker::Picker;
use crate::source::ProxySource;

use log::{debug, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared, thread-safe set of proxy addresses.
///
/// Reads (`pick_random`, `snapshot`) share the lock; `add` and `replace_all`
/// take it exclusively. The lock is never held while the source is read.
pub struct ProxyPool {
    /// All proxy addresses, in load order.
    proxies: RwLock<Vec<String>>,
    /// Where `reload` reads the list from.
    source: Arc<dyn ProxySource>,
    /// Randomness for selection.
    picker: Box<dyn Picker>,
}

impl ProxyPool {
    /// Create a pool and populate it from `source`.
    ///
    /// Construction never fails. If the source is missing the pool silently
    /// starts with `defaults`; any other load error is logged and the pool
    /// also falls back to `defaults`.
    pub async fn new(
        source: Arc<dyn ProxySource>,
        picker: Box<dyn Picker>,
        defaults: Vec<String>,
    ) -> Arc<Self> {
        let pool = Arc::new(Self::with_proxies(source, picker, Vec::new()));

        match pool.reload().await {
            Ok(count) => info!("Loaded {} proxies", count),
            Err(e) if e.is_not_found() => {
                info!("{}, using {} default proxies", e, defaults.len());
                pool.replace_all(defaults);
            }
            Err(e) => {
                warn!("Error loading proxies: {}. Using default proxies.", e);
                pool.replace_all(defaults);
            }
        }

        pool
    }

    /// Create a pool holding `proxies` without touching the source.
    pub fn with_proxies(
        source: Arc<dyn ProxySource>,
        picker: Box<dyn Picker>,
        proxies: Vec<String>,
    ) -> Self {
        Self {
            proxies: RwLock::new(proxies),
            source,
            picker,
        }
    }

    /// Pick a proxy uniformly at random.
    pub fn pick_random(&self) -> Result<String, SelectError> {
        let proxies = self.proxies.read();
        if proxies.is_empty() {
            return Err(SelectError::NoProxiesAvailable);
        }
        let idx = self.picker.pick(proxies.len());
        Ok(proxies[idx].clone())
    }

    /// Pick a proxy uniformly at random among those not listed in `tried`.
    ///
    /// Fails only when the pool itself is empty; returns `Ok(None)` when every
    /// address in the pool has already been tried.
    pub fn pick_random_excluding(&self, tried: &[String]) -> Result<Option<String>, SelectError> {
        let proxies = self.proxies.read();
        if proxies.is_empty() {
            return Err(SelectError::NoProxiesAvailable);
        }

        let candidates: Vec<&String> = proxies.iter().filter(|p| !tried.contains(*p)).collect();
        if candidates.is_empty() {
            return Ok(None);
        }
        let idx = self.picker.pick(candidates.len());
        Ok(Some(candidates[idx].clone()))
    }

    /// Swap the stored sequence for `proxies`.
    pub fn replace_all(&self, proxies: Vec<String>) {
        *self.proxies.write() = proxies;
    }

    /// Insert `proxy` unless it is already present.
    pub fn add(&self, proxy: impl Into<String>) {
        let proxy = proxy.into();
        let mut proxies = self.proxies.write();
        if proxies.iter().any(|p| *p == proxy) {
            debug!("Proxy {} already in pool", proxy);
            return;
        }
        proxies.push(proxy);
    }

    /// Copy of the current sequence.
    pub fn snapshot(&self) -> Vec<String> {
        self.proxies.read().clone()
    }

    /// Number of addresses currently stored.
    pub fn len(&self) -> usize {
        self.proxies.read().len()
    }

    /// Whether the pool holds no addresses.
    pub fn is_empty(&self) -> bool {
        self.proxies.read().is_empty()
    }

    /// Re-read the source and replace the pool contents with it.
    ///
    /// On error the previous contents are kept as they were.
    pub async fn reload(&self) -> Result<usize, LoadError> {
        let proxies = self.source.load().await?;
        let count = proxies.len();
        self.replace_all(proxies);
        Ok(count)
    }
}
