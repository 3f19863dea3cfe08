//! Liveness checks for individual proxies.

use crate::config::ProxyPoolConfig;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Decides whether a proxy can currently reach the outside world.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Never fails; any problem with the proxy means `false`.
    async fn is_live(&self, proxy: &str) -> bool;
}

/// Validator that fetches a well-known page through the candidate proxy.
#[derive(Debug, Clone)]
pub struct HttpValidator {
    /// Page fetched through the proxy.
    check_url: String,
    /// Limit on establishing the connection to the proxy.
    connect_timeout: Duration,
    /// Limit on the whole request.
    timeout: Duration,
}

impl HttpValidator {
    pub fn new(check_url: impl Into<String>, connect_timeout: Duration, timeout: Duration) -> Self {
        Self {
            check_url: check_url.into(),
            connect_timeout,
            timeout,
        }
    }

    pub fn from_config(config: &ProxyPoolConfig) -> Self {
        Self::new(
            config.health_check_url.clone(),
            config.connect_timeout,
            config.health_check_timeout,
        )
    }
}

impl Default for HttpValidator {
    fn default() -> Self {
        Self::from_config(&ProxyPoolConfig::default())
    }
}

#[async_trait]
impl Validator for HttpValidator {
    async fn is_live(&self, proxy: &str) -> bool {
        let proxy_url = match Url::parse(proxy) {
            Ok(url) => url,
            Err(e) => {
                debug!("Proxy {} is not a valid URL: {}", proxy, e);
                return false;
            }
        };

        let reqwest_proxy = match reqwest::Proxy::all(proxy_url) {
            Ok(p) => p,
            Err(e) => {
                debug!("Proxy {} rejected by client: {}", proxy, e);
                return false;
            }
        };

        let client = match Client::builder()
            .proxy(reqwest_proxy)
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                debug!("Failed to build client for proxy {}: {}", proxy, e);
                return false;
            }
        };

        match client.get(&self.check_url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                debug!("Proxy {} answered {} for {}", proxy, resp.status(), self.check_url);
                false
            }
            Err(e) => {
                debug!("Proxy {} failed to reach {}: {}", proxy, self.check_url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::one_shot_server;
    use tokio::net::TcpListener;

    // The check target is plain HTTP so the request goes to the fake proxy
    // in absolute form and the target name is never resolved.
    const CHECK_URL: &str = "http://liveness.invalid/";

    fn validator() -> HttpValidator {
        HttpValidator::new(CHECK_URL, Duration::from_secs(2), Duration::from_secs(3))
    }

    async fn one_shot_proxy(status_line: &'static str) -> String {
        one_shot_server(status_line).await.0
    }

    #[tokio::test]
    async fn unparsable_address_is_not_live() {
        assert!(!validator().is_live("not a proxy").await);
        assert!(!validator().is_live("").await);
    }

    #[tokio::test]
    async fn success_status_is_live() {
        let (proxy, request) = one_shot_server("HTTP/1.1 200 OK").await;
        assert!(validator().is_live(&proxy).await);
        assert!(request.await.unwrap().starts_with("GET http://liveness.invalid/ HTTP/1.1"));
    }

    #[tokio::test]
    async fn no_content_is_live() {
        let proxy = one_shot_proxy("HTTP/1.1 204 No Content").await;
        assert!(validator().is_live(&proxy).await);
    }

    #[tokio::test]
    async fn error_status_is_not_live() {
        let proxy = one_shot_proxy("HTTP/1.1 503 Service Unavailable").await;
        assert!(!validator().is_live(&proxy).await);
    }

    #[tokio::test]
    async fn refused_connection_is_not_live() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(!validator().is_live(&format!("http://{}", addr)).await);
    }

    #[tokio::test]
    async fn silent_proxy_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold the connection open without answering.
            let conn = listener.accept().await;
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(conn);
        });

        let validator = HttpValidator::new(
            CHECK_URL,
            Duration::from_millis(200),
            Duration::from_millis(300),
        );
        assert!(!validator.is_live(&format!("http://{}", addr)).await);
    }

    #[test]
    fn default_uses_public_check_url() {
        let validator = HttpValidator::default();
        assert_eq!(validator.check_url, "https://www.google.com");
        assert_eq!(validator.connect_timeout, Duration::from_secs(5));
        assert_eq!(validator.timeout, Duration::from_secs(10));
    }
}
