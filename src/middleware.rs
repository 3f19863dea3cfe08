//! Middleware implementation for reqwest.

use crate::selector::ProxySelector;

use anyhow::anyhow;
use async_trait::async_trait;
use log::{info, warn};
use reqwest_middleware::{Error, Middleware, Next, Result};
use std::sync::Arc;
use std::time::Duration;

/// Middleware that sends each request through a proxy from the pool.
///
/// When no proxy can be handed out the request continues down the chain
/// unproxied instead of failing.
#[derive(Clone)]
pub struct ProxyPoolMiddleware {
    /// Where proxies come from.
    selector: Arc<ProxySelector>,
    /// Whether to route requests through a proxy at all.
    use_proxy: bool,
    /// Whether to check a proxy's liveness before using it.
    validate: bool,
    /// Timeout for proxied requests.
    timeout: Duration,
}

impl ProxyPoolMiddleware {
    pub fn new(selector: Arc<ProxySelector>) -> Self {
        Self {
            selector,
            use_proxy: true,
            validate: false,
            timeout: Duration::from_secs(30),
        }
    }

    /// Turn proxying on or off.
    pub fn use_proxy(mut self, enabled: bool) -> Self {
        self.use_proxy = enabled;
        self
    }

    /// Validate proxies before using them.
    pub fn validate(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// Set the timeout for requests sent through a proxy.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Middleware for ProxyPoolMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> Result<reqwest::Response> {
        if !self.use_proxy {
            info!("Proxy usage disabled for request: {}", req.url());
            return next.run(req, extensions).await;
        }

        let proxy_url = match self.selector.get_proxy(self.validate).await {
            Ok(proxy) => proxy,
            Err(e) => {
                warn!("No valid proxy found ({}), proceeding without proxy", e);
                return next.run(req, extensions).await;
            }
        };

        let reqwest_proxy = match reqwest::Proxy::all(&proxy_url) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to create proxy from {}: {}, proceeding without proxy", proxy_url, e);
                return next.run(req, extensions).await;
            }
        };

        let client = reqwest::Client::builder()
            .proxy(reqwest_proxy)
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                Error::Middleware(anyhow!("failed to build client for proxy {}: {}", proxy_url, e))
            })?;

        info!("Using proxy for request {}: {}", req.url(), proxy_url);
        client.execute(req).await.map_err(Error::Reqwest)
    }
}
