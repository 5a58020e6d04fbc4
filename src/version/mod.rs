//! Version resolution.
//!
//! A run targets either the version given on the command line or the latest
//! version reported by the product's checkpoint service. Either way the result
//! is normalised: a leading `v` is stripped, so `v1.7.0` and `1.7.0` name the
//! same release.
//!
//! # Checkpoint Response
//!
//! The checkpoint service answers `GET /v1/check/<product>` with a JSON document.
//! Only `current_version` is required; the remaining fields are informational.
//!
//! ```json
//! {
//!   "product": "terraform",
//!   "current_version": "1.7.0",
//!   "current_release": 1705000000,
//!   "current_download_url": "https://releases.example.com/terraform/1.7.0/",
//!   "current_changelog_url": "https://example.com/CHANGELOG.md",
//!   "project_website": "https://example.com",
//!   "alerts": []
//! }
//! ```

use crate::core::FetchError;
use serde::Deserialize;
use tracing::{debug, info};

/// Body of a checkpoint response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckpointResponse {
    /// Product name echoed back by the service
    #[serde(default)]
    pub product: String,
    /// Latest released version
    #[serde(default)]
    pub current_version: String,
    /// Release timestamp (seconds since the epoch)
    #[serde(default)]
    pub current_release: i64,
    /// Landing page for the current release downloads
    #[serde(default)]
    pub current_download_url: String,
    /// Changelog location
    #[serde(default)]
    pub current_changelog_url: String,
    /// Project homepage
    #[serde(default)]
    pub project_website: String,
    /// Security or deprecation alerts, passed through untyped
    #[serde(default)]
    pub alerts: Vec<serde_json::Value>,
}

/// Strip a single leading `v` from a version string.
pub fn normalize_version(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Resolves the version a run should fetch.
pub struct VersionResolver<'a> {
    client: &'a reqwest::Client,
    checkpoint_url: String,
}

impl<'a> VersionResolver<'a> {
    /// Resolver querying `checkpoint_url` through `client`.
    pub fn new(client: &'a reqwest::Client, checkpoint_url: impl Into<String>) -> Self {
        Self {
            client,
            checkpoint_url: checkpoint_url.into(),
        }
    }

    /// The explicit version if one was given, otherwise the latest release.
    ///
    /// A non-empty `explicit` version never touches the network.
    pub async fn resolve_target(&self, explicit: Option<&str>) -> Result<String, FetchError> {
        match explicit.map(str::trim).filter(|v| !v.is_empty()) {
            Some(version) => {
                debug!("Using explicit version {version}");
                Ok(normalize_version(version).to_string())
            }
            None => self.resolve_latest().await,
        }
    }

    /// Ask the checkpoint service for the latest version.
    pub async fn resolve_latest(&self) -> Result<String, FetchError> {
        let url = self.checkpoint_url.as_str();
        debug!("Querying latest version from {url}");

        let response = self.client.get(url).send().await.map_err(|e| FetchError::network(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::network(url, &e))?;
        let check: CheckpointResponse = serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let version = normalize_version(check.current_version.trim());
        if version.is_empty() {
            return Err(FetchError::EmptyVersion {
                url: url.to_string(),
            });
        }

        info!("Latest version is {version}");
        Ok(version.to_string())
    }
}
