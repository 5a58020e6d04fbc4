//! relfetch - release fetcher
//!
//! Downloads the platform-specific zip archive of a single-binary tool release,
//! unpacks it safely and optionally installs the executable, remembering what it
//! did in a small state file so repeated unattended runs only act when a new
//! release appears.
//!
//! # Pipeline
//!
//! ```text
//! load state -> resolve version -> decide -> download -> extract -> install -> save state
//! ```
//!
//! # Modules
//!
//! - [`cli`] - flag parsing and the entry point used by `main`
//! - [`runner`] - orchestration of one run
//! - [`config`] - persisted state and release source configuration
//! - [`version`] - explicit or latest version resolution
//! - [`download`] - streamed archive download
//! - [`archive`] - zip extraction with path-traversal protection
//! - [`installer`] - install decision and binary placement
//! - [`core`] - error types and user-facing error rendering
//! - [`utils`] - HTTP client, platform naming, progress and path helpers
//!
//! # Example
//!
//! ```rust,no_run
//! use relfetch::runner::{RunRequest, Runner};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let runner = Runner::from_env()?;
//! let outcome = runner.run(&RunRequest::unattended()).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod core;
pub mod download;
pub mod installer;
pub mod runner;
pub mod utils;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
