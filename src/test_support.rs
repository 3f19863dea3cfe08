//! Fakes shared by the unit tests.

use crate::error::LoadError;
use crate::source::ProxySource;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Source returning scripted results in order, then `NotFound` once exhausted.
pub(crate) struct ScriptedSource {
    results: Mutex<Vec<Result<Vec<String>, LoadError>>>,
}

impl ScriptedSource {
    pub(crate) fn new(mut results: Vec<Result<Vec<String>, LoadError>>) -> Arc<Self> {
        results.reverse();
        Arc::new(Self {
            results: Mutex::new(results),
        })
    }

    pub(crate) fn ok(proxies: &[&str]) -> Arc<Self> {
        Self::new(vec![Ok(strings(proxies))])
    }

    pub(crate) fn empty() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ProxySource for ScriptedSource {
    async fn load(&self) -> Result<Vec<String>, LoadError> {
        self.results
            .lock()
            .pop()
            .unwrap_or_else(|| Err(LoadError::NotFound("exhausted".to_string())))
    }
}

/// Serve a single HTTP exchange on a local port, answering with `status_line`
/// and an empty body.
///
/// Returns the server's base URL and a handle yielding the raw request head.
pub(crate) async fn one_shot_server(status_line: &'static str) -> (String, JoinHandle<String>) {
    one_shot_server_with_body(status_line, "").await
}

/// Like `one_shot_server`, but answers with `body`.
pub(crate) async fn one_shot_server_with_body(
    status_line: &'static str,
    body: &'static str,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut request = Vec::new();
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "{}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{}", addr), handle)
}

/// Route `log` output through the test harness.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
