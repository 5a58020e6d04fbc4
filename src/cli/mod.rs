//! Command-line interface for relfetch.
//!
//! relfetch takes flags only, no subcommands. Running it with no flags at all
//! is the unattended mode meant for cron: it checks for a new release and skips
//! the download when the saved version is current, unless a saved install makes
//! it download and reinstall.
//!
//! # Flags
//!
//! - `--os <OS>` / `--arch <ARCH>` - target platform (default: host)
//! - `--ver <VERSION>` - release to fetch (default: latest)
//! - `--install` / `--install-path <DIR>` - install the executable after download
//! - `-f, --force` - proceed even when up to date, reusing the saved install
//!   settings unless `--install` is given
//! - `-q, --quiet` - no URL, no progress bar
//! - `--version` - print the relfetch version
//!
//! # Environment
//!
//! - `RELFETCH_CONFIG_PATH` - state file location
//! - `RELFETCH_PRODUCT`, `RELFETCH_CHECKPOINT_URL`, `RELFETCH_RELEASES_URL` -
//!   release source overrides
//! - `RELFETCH_NO_PROGRESS` - hide the progress bar
//! - `RUST_LOG` - log filter (default `warn`)

use crate::installer::RunMode;
use crate::runner::{RunRequest, Runner};
use crate::utils::platform::{KNOWN_ARCH, KNOWN_OS};
use anyhow::Result;
use clap::Parser;
use tracing::warn;

const AFTER_HELP: &str = "\
Examples:
  # Download the latest release for this machine
  relfetch

  # Download and install to /usr/local/bin
  relfetch --install --install-path /usr/local/bin

  # Force re-download and install even if up to date
  relfetch -f

  # Download a specific version for another platform
  relfetch --os linux --arch arm64 --ver 1.7.0

State file:
  ~/.relfetch.conf (override with RELFETCH_CONFIG_PATH) records the last
  version fetched and the install settings. Running relfetch with no flags
  installs to the saved path when installation was enabled, even if that
  version is still the latest. Without a saved install it skips the download
  when the version is unchanged.";

/// Release fetcher command line.
#[derive(Parser, Debug)]
#[command(
    name = "relfetch",
    about = "Download, unpack and install the latest release of a single-binary tool",
    disable_version_flag = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Target OS (linux, windows, darwin, freebsd, openbsd, solaris). Default: current OS
    #[arg(long, value_name = "OS")]
    pub os: Option<String>,

    /// Target architecture (amd64, 386, arm64, arm). Default: current architecture
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// Release version to fetch, e.g. 1.7.0. Default: latest
    #[arg(long = "ver", value_name = "VERSION")]
    pub ver: Option<String>,

    /// Print the relfetch version
    #[arg(long)]
    pub version: bool,

    /// Install the executable after downloading
    #[arg(long)]
    pub install: bool,

    /// Directory to install the executable into
    #[arg(long, value_name = "DIR")]
    pub install_path: Option<String>,

    /// Quiet mode: no URL, no progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Download and install even if already up to date. Reuses the saved
    /// install settings unless --install is given
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// `Unattended` when no flag was given at all.
    pub fn run_mode(&self) -> RunMode {
        let any_flag = self.os.is_some()
            || self.arch.is_some()
            || self.ver.is_some()
            || self.version
            || self.install
            || self.install_path.is_some()
            || self.quiet
            || self.force;

        if any_flag { RunMode::Explicit } else { RunMode::Unattended }
    }

    /// Build the orchestrator request from the parsed flags.
    pub fn to_request(&self) -> RunRequest {
        RunRequest {
            mode: self.run_mode(),
            os: self.os.clone(),
            arch: self.arch.clone(),
            version: self.ver.clone(),
            install: self.install,
            install_path: self.install_path.clone(),
            quiet: self.quiet,
            force: self.force,
        }
    }

    /// Run the command.
    pub async fn execute(self) -> Result<()> {
        if self.version {
            println!("relfetch version {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }

        if let Some(os) = self.os.as_deref().filter(|os| !KNOWN_OS.contains(os)) {
            warn!("Unrecognised target OS '{os}', the release may not exist");
        }
        if let Some(arch) = self.arch.as_deref().filter(|arch| !KNOWN_ARCH.contains(arch)) {
            warn!("Unrecognised target architecture '{arch}', the release may not exist");
        }

        let runner = Runner::from_env()?;
        runner.run(&self.to_request()).await?;
        Ok(())
    }
}
