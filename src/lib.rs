//! # proxy-manager
//!
//! Hands out HTTP(S) proxies from a shared pool.
//!
//! A [`ProxySelector`] picks a random proxy from a [`ProxyPool`] and, when
//! asked, checks that it can reach the public internet before returning it.
//! Dead candidates are replaced by different ones a bounded number of times.
//! The pool is loaded from a line-oriented [`ProxySource`] and can be
//! reloaded at runtime. [`ProxyPoolMiddleware`] plugs the selector into a
//! reqwest client.

pub mod config;
pub mod error;
pub mod middleware;
pub mod picker;
pub mod pool;
pub mod selector;
pub mod source;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use config::{ProxyPoolConfig, ProxyPoolConfigBuilder, DEFAULT_PROXIES};
pub use error::{LoadError, SelectError};
pub use middleware::ProxyPoolMiddleware;
pub use picker::{Picker, RandomPicker};
pub use pool::ProxyPool;
pub use selector::{parse_validate_flag, ProxySelector, VALIDATION_RETRIES};
pub use source::{FileSource, ProxySource, UrlSource};
pub use validator::{HttpValidator, Validator};
