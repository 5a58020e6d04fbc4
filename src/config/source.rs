//! Where releases come from.
//!
//! A [`ReleaseSource`] names the product and the two endpoints relfetch talks
//! to: the checkpoint service that reports the latest version, and the release
//! server that hosts one zip archive per version, OS and architecture.
//!
//! URL templates substitute `{product}`, `{version}`, `{os}` and `{arch}`.
//! Every field can be overridden through the environment, which is how tests
//! point relfetch at a local server.

use std::path::{Path, PathBuf};

/// Environment variable overriding [`ReleaseSource::product`].
pub const PRODUCT_ENV: &str = "RELFETCH_PRODUCT";
/// Environment variable overriding [`ReleaseSource::checkpoint_url`].
pub const CHECKPOINT_URL_ENV: &str = "RELFETCH_CHECKPOINT_URL";
/// Environment variable overriding [`ReleaseSource::releases_url`].
pub const RELEASES_URL_ENV: &str = "RELFETCH_RELEASES_URL";

const DEFAULT_PRODUCT: &str = "terraform";
const DEFAULT_CHECKPOINT_URL: &str = "https://checkpoint-api.hashicorp.com/v1/check/{product}";
const DEFAULT_RELEASES_URL: &str =
    "https://releases.hashicorp.com/{product}/{version}/{product}_{version}_{os}_{arch}.zip";

/// Product name and endpoint templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    /// Product name, also the executable's base name
    pub product: String,
    /// Checkpoint URL template (`{product}`)
    pub checkpoint_url: String,
    /// Archive URL template (`{product}`, `{version}`, `{os}`, `{arch}`)
    pub releases_url: String,
}

impl Default for ReleaseSource {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT)
    }
}

impl ReleaseSource {
    /// Source for `product` on the default endpoints.
    pub fn new(product: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            checkpoint_url: DEFAULT_CHECKPOINT_URL.to_string(),
            releases_url: DEFAULT_RELEASES_URL.to_string(),
        }
    }

    /// Builder method replacing both endpoint templates.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        checkpoint_url: impl Into<String>,
        releases_url: impl Into<String>,
    ) -> Self {
        self.checkpoint_url = checkpoint_url.into();
        self.releases_url = releases_url.into();
        self
    }

    /// Defaults with any `RELFETCH_*` environment overrides applied.
    pub fn from_env() -> Self {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let mut source = Self::new(env(PRODUCT_ENV).unwrap_or_else(|| DEFAULT_PRODUCT.to_string()));
        if let Some(url) = env(CHECKPOINT_URL_ENV) {
            source.checkpoint_url = url;
        }
        if let Some(url) = env(RELEASES_URL_ENV) {
            source.releases_url = url;
        }
        source
    }

    /// Checkpoint URL for this product.
    pub fn checkpoint_url(&self) -> String {
        self.checkpoint_url.replace("{product}", &self.product)
    }

    /// Archive URL for a concrete version and platform.
    pub fn archive_url(&self, version: &str, os: &str, arch: &str) -> String {
        self.releases_url
            .replace("{product}", &self.product)
            .replace("{version}", version)
            .replace("{os}", os)
            .replace("{arch}", arch)
    }

    /// Local file name of the archive: `<product>_<version>_<os>_<arch>.zip`.
    pub fn archive_file_name(&self, version: &str, os: &str, arch: &str) -> String {
        format!("{}_{version}_{os}_{arch}.zip", self.product)
    }

    /// Local archive path inside `dir`.
    pub fn archive_path(&self, dir: &Path, version: &str, os: &str, arch: &str) -> PathBuf {
        dir.join(self.archive_file_name(version, os, arch))
    }

    /// Executable name inside the archive, `.exe` suffixed for Windows targets.
    pub fn binary_name(&self, target_os: &str) -> String {
        if target_os == "windows" {
            format!("{}.exe", self.product)
        } else {
            self.product.clone()
        }
    }
}
