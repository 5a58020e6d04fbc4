//! Run orchestration.
//!
//! [`Runner::run`] drives one invocation end to end:
//!
//! 1. Load the persisted state (a failure is a warning)
//! 2. In unattended mode, re-enable installation from state
//! 3. Resolve the target version
//! 4. Skip everything if an unattended run is already up to date and nothing
//!    is to be installed
//! 5. With `--force`, re-enable installation from state
//! 6. Download the archive
//! 7. Save the new state (a failure is a warning)
//! 8. Install it, or print how to enable installation
//!
//! An unattended run with a saved install therefore always downloads and
//! reinstalls, even when the version is unchanged.

use crate::config::{PersistedState, ReleaseSource};
use crate::download::ArchiveFetcher;
use crate::installer::{self, Decision, RunMode};
use crate::utils::http;
use crate::utils::platform::ResolvedTarget;
use crate::version::VersionResolver;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Everything the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Explicit or unattended invocation
    pub mode: RunMode,
    /// Target OS override
    pub os: Option<String>,
    /// Target architecture override
    pub arch: Option<String>,
    /// Explicit version; `None` means latest
    pub version: Option<String>,
    /// `--install` was given
    pub install: bool,
    /// `--install-path` value
    pub install_path: Option<String>,
    /// Suppress the URL and progress bar
    pub quiet: bool,
    /// Proceed even when up to date
    pub force: bool,
}

impl RunRequest {
    /// A request with no flags, as run from cron.
    pub fn unattended() -> Self {
        Self {
            mode: RunMode::Unattended,
            os: None,
            arch: None,
            version: None,
            install: false,
            install_path: None,
            quiet: false,
            force: false,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing to do
    UpToDate {
        /// The version already present
        version: String,
    },
    /// Archive downloaded, not installed
    Downloaded {
        /// Version downloaded
        version: String,
        /// Archive location
        archive: PathBuf,
    },
    /// Archive downloaded and its executable installed
    Installed {
        /// Version installed
        version: String,
        /// Installed executable
        destination: PathBuf,
    },
}

/// Orchestrates one fetch run.
pub struct Runner {
    client: reqwest::Client,
    source: ReleaseSource,
    state_path: PathBuf,
    work_dir: PathBuf,
}

impl Runner {
    /// Runner with explicit collaborators.
    pub fn new(
        client: reqwest::Client,
        source: ReleaseSource,
        state_path: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            source,
            state_path: state_path.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Runner configured from the process environment, downloading into the
    /// current directory.
    pub fn from_env() -> Result<Self> {
        let client = http::build_client()?;
        let work_dir = std::env::current_dir().context("Failed to determine current directory")?;
        Ok(Self::new(client, ReleaseSource::from_env(), PersistedState::default_path(), work_dir))
    }

    /// The release source in use.
    pub fn source(&self) -> &ReleaseSource {
        &self.source
    }

    /// Execute `request`.
    pub async fn run(&self, request: &RunRequest) -> Result<RunOutcome> {
        let mut state = match PersistedState::load(&self.state_path).await {
            Ok(state) => state,
            Err(e) => {
                warn!("Could not load state: {e}");
                eprintln!("{}: Could not load state: {e}", "warning".yellow());
                PersistedState::default()
            }
        };

        let mut install = request.install;
        let mut install_path = request.install_path.clone().unwrap_or_default();
        let state_installs = state.install_enabled && !state.install_path.is_empty();

        if request.mode == RunMode::Unattended && state_installs {
            debug!("Installing to {} from saved state", state.install_path);
            install = true;
            install_path = state.install_path.clone();
        }

        let resolver = VersionResolver::new(&self.client, self.source.checkpoint_url());
        let version = resolver
            .resolve_target(request.version.as_deref())
            .await
            .context("Failed to resolve version")?;

        if installer::decide(request.mode, request.force, install, &state, &version)
            == Decision::UpToDate
        {
            println!("Already up to date (version {version})");
            return Ok(RunOutcome::UpToDate { version });
        }

        if request.force && !request.install && state_installs {
            install = true;
            install_path = state.install_path.clone();
        }

        let target = ResolvedTarget::new(request.os.as_deref(), request.arch.as_deref(), version.clone());
        let fetcher = ArchiveFetcher::new(&self.client, &self.source, &self.work_dir);
        let artifact = fetcher
            .download(&target, request.quiet)
            .await
            .context("Failed to download archive")?;

        if let Err(e) = state.update(&self.state_path, &version, install, &install_path).await {
            warn!("Could not save state: {e}");
            eprintln!("{}: Could not save state: {e}", "warning".yellow());
        }

        let outcome = if install && !install_path.is_empty() {
            let destination = installer::expand_install_path(&install_path);
            let installed =
                installer::install_from_archive(&artifact.local_path, &destination, &self.source, &target.os)
                    .context("Failed to install")?;

            println!(
                "{} {} {} to {}",
                "Successfully installed".green(),
                self.source.product,
                version,
                destination.display()
            );
            RunOutcome::Installed {
                version: version.clone(),
                destination: installed,
            }
        } else {
            println!("\nDownload complete! {} {} is ready.", self.source.product, version);
            println!("To install automatically next time, use:");
            println!("  relfetch --install --install-path /path/to/install");
            RunOutcome::Downloaded {
                version: version.clone(),
                archive: artifact.local_path,
            }
        };

        Ok(outcome)
    }
}
