//! Persisted install state.
//!
//! A tiny `key=value` file remembers the last version fetched and whether (and
//! where) the binary should be installed. Unattended runs use it to skip work
//! when nothing changed and to repeat the previous install.
//!
//! # File Format
//!
//! ```text
//! # relfetch state file
//! # Last updated: 2026-10-19
//!
//! version=1.7.0
//! install=true
//! install_path=/usr/local/bin
//! ```
//!
//! Parsing is tolerant: blank lines and `#` comments are skipped, lines without
//! `=` are skipped with a warning, unknown keys are ignored and keys and values
//! are trimmed. A missing file is the empty state, not an error.
//!
//! # Location
//!
//! - **Default**: `~/.relfetch.conf`
//! - **Override**: the `RELFETCH_CONFIG_PATH` environment variable

use crate::core::FetchError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Environment variable overriding the state file location.
pub const CONFIG_PATH_ENV: &str = "RELFETCH_CONFIG_PATH";

const STATE_FILE_NAME: &str = ".relfetch.conf";

/// Last-known version and install settings.
///
/// `install_enabled` with an empty `install_path` means installation is
/// silently skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    /// Version fetched by the last successful run, empty if none
    pub last_version: String,
    /// Whether unattended runs should install
    pub install_enabled: bool,
    /// Directory the binary is installed into
    pub install_path: String,
}

impl PersistedState {
    /// Load state from `path`.
    ///
    /// Returns the default state when the file does not exist. Malformed lines are
    /// logged and skipped; only read failures are returned as errors.
    pub async fn load(path: &Path) -> Result<Self, FetchError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No state file at {}, starting fresh", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(FetchError::io("read state file", path, e)),
        };

        Ok(Self::parse(&content, path))
    }

    /// Parse state file content. `path` is only used in warnings.
    pub fn parse(content: &str, path: &Path) -> Self {
        let mut state = Self::default();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = || FetchError::ConfigMalformed {
                path: path.to_path_buf(),
                line_number: index + 1,
                line: raw.to_string(),
            };

            let Some((key, value)) = line.split_once('=') else {
                warn!("{}", malformed());
                continue;
            };

            let value = value.trim();
            match key.trim() {
                "version" => state.last_version = value.to_string(),
                "install" => {
                    state.install_enabled = parse_bool(value).unwrap_or_else(|| {
                        warn!("{}", malformed());
                        false
                    });
                }
                "install_path" => state.install_path = value.to_string(),
                other => debug!("Ignoring unknown state key '{other}'"),
            }
        }

        state
    }

    /// Render the file content, header included.
    pub fn render(&self) -> String {
        format!(
            "# relfetch state file\n# Last updated: {}\n\nversion={}\ninstall={}\ninstall_path={}\n",
            chrono::Local::now().format("%Y-%m-%d"),
            self.last_version,
            self.install_enabled,
            self.install_path
        )
    }

    /// Overwrite the file at `path`, creating parent directories as needed.
    pub async fn save(&self, path: &Path) -> Result<(), FetchError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::io("create state directory", parent, e))?;
        }

        fs::write(path, self.render())
            .await
            .map_err(|e| FetchError::io("write state file", path, e))?;

        debug!("Saved state to {}", path.display());
        Ok(())
    }

    /// Record the outcome of a run and save.
    ///
    /// An empty `version` keeps the previous one. The install fields are always
    /// overwritten.
    pub async fn update(
        &mut self,
        path: &Path,
        version: &str,
        install_enabled: bool,
        install_path: &str,
    ) -> Result<(), FetchError> {
        if !version.is_empty() {
            self.last_version = version.to_string();
        }
        self.install_enabled = install_enabled;
        self.install_path = install_path.to_string();
        self.save(path).await
    }

    /// Default state file location.
    ///
    /// `RELFETCH_CONFIG_PATH` wins; otherwise `~/.relfetch.conf`, or
    /// `./.relfetch.conf` when no home directory is known.
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }

        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(STATE_FILE_NAME)
    }
}

/// Boolean spellings accepted in the state file.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
