//! Shared HTTP client.
//!
//! Version lookups and archive downloads go through one [`reqwest::Client`]
//! with a long overall timeout (archives can be large) and a proxy taken from
//! the environment on every request:
//!
//! 1. `https_proxy`
//! 2. `HTTPS_PROXY`
//! 3. `http_proxy`
//! 4. `HTTP_PROXY`
//!
//! The first set, non-empty variable wins for both `http` and `https` URLs. A
//! value that does not parse as a URL is logged and ignored, so the request
//! goes direct.

use crate::core::FetchError;
use std::time::Duration;
use tracing::{debug, warn};

/// Overall timeout for a single request, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Proxy environment variables in lookup order.
pub const PROXY_ENV_VARS: [&str; 4] = ["https_proxy", "HTTPS_PROXY", "http_proxy", "HTTP_PROXY"];

const USER_AGENT: &str = concat!("relfetch/", env!("CARGO_PKG_VERSION"));

/// Build the client used by the CLI, reading proxies from the process environment.
pub fn build_client() -> Result<reqwest::Client, FetchError> {
    build_client_with(|name| std::env::var(name).ok())
}

/// Build a client whose proxy lookup uses `lookup` instead of the process
/// environment.
///
/// `lookup` is consulted on every request, so changes take effect without
/// rebuilding the client. Tests pass `|_| None` to go direct.
pub fn build_client_with<F>(lookup: F) -> Result<reqwest::Client, FetchError>
where
    F: Fn(&str) -> Option<String> + Send + Sync + 'static,
{
    let proxy = reqwest::Proxy::custom(move |_url| {
        let value = proxy_from_env(&lookup)?;
        match reqwest::Url::parse(&value) {
            Ok(proxy_url) => {
                debug!("Using proxy {proxy_url}");
                Some(proxy_url)
            }
            Err(e) => {
                warn!("Ignoring invalid proxy URL '{value}': {e}");
                None
            }
        }
    });

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .proxy(proxy)
        .build()
        .map_err(|e| FetchError::Network {
            url: String::new(),
            reason: format!("failed to build HTTP client: {e}"),
        })
}

/// First non-empty proxy variable, in [`PROXY_ENV_VARS`] order.
pub fn proxy_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    PROXY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
}
