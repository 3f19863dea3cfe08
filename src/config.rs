//! Configuration for the proxy pool.

use std::env;
use std::time::Duration;

/// Proxies used when no list can be loaded at startup.
pub const DEFAULT_PROXIES: [&str; 5] = [
    "http://103.152.112.162:80",
    "http://103.83.232.122:80",
    "http://51.159.115.233:3128",
    "http://20.111.54.16:80",
    "http://103.117.192.14:80",
];

/// Configuration for the proxy pool.
#[derive(Debug, Clone)]
pub struct ProxyPoolConfig {
    /// File path or http(s) URL of the proxy list.
    pub source: String,
    /// Proxies to start with when the list cannot be loaded.
    pub default_proxies: Vec<String>,
    /// URL fetched through a proxy to decide whether it is live.
    pub health_check_url: String,
    /// Timeout for connecting to a proxy during a health check.
    pub connect_timeout: Duration,
    /// Timeout for a whole health check request.
    pub health_check_timeout: Duration,
    /// Seed for proxy selection. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl ProxyPoolConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProxyPoolConfigBuilder {
        ProxyPoolConfigBuilder::new()
    }

    /// Build a configuration from `PROXY_FILE` and `PROXY_CHECK_URL`,
    /// falling back to defaults for unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut builder = Self::builder();
        if let Some(source) = var("PROXY_FILE") {
            builder = builder.source(source);
        }
        if let Some(url) = var("PROXY_CHECK_URL") {
            builder = builder.health_check_url(url);
        }
        builder.build()
    }
}

impl Default for ProxyPoolConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for `ProxyPoolConfig`.
pub struct ProxyPoolConfigBuilder {
    source: Option<String>,
    default_proxies: Option<Vec<String>>,
    health_check_url: Option<String>,
    connect_timeout: Option<Duration>,
    health_check_timeout: Option<Duration>,
    seed: Option<u64>,
}

impl ProxyPoolConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            source: None,
            default_proxies: None,
            health_check_url: None,
            connect_timeout: None,
            health_check_timeout: None,
            seed: None,
        }
    }

    /// Set the file path or URL to load proxies from.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the proxies used when the source cannot be loaded.
    pub fn default_proxies(mut self, proxies: Vec<impl Into<String>>) -> Self {
        self.default_proxies = Some(proxies.into_iter().map(Into::into).collect());
        self
    }

    /// Set the URL used for health checks.
    pub fn health_check_url(mut self, url: impl Into<String>) -> Self {
        self.health_check_url = Some(url.into());
        self
    }

    /// Set the connect timeout for health checks.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Set the overall timeout for health checks.
    pub fn health_check_timeout(mut self, timeout: Duration) -> Self {
        self.health_check_timeout = Some(timeout);
        self
    }

    /// Seed proxy selection for reproducible picks.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> ProxyPoolConfig {
        ProxyPoolConfig {
            source: self.source.unwrap_or_else(|| "proxies.txt".to_string()),
            default_proxies: self
                .default_proxies
                .unwrap_or_else(|| DEFAULT_PROXIES.iter().map(|p| p.to_string()).collect()),
            health_check_url: self
                .health_check_url
                .unwrap_or_else(|| "https://www.google.com".to_string()),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(5)),
            health_check_timeout: self.health_check_timeout.unwrap_or(Duration::from_secs(10)),
            seed: self.seed,
        }
    }
}

impl Default for ProxyPoolConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
