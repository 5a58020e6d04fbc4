//! Download progress display.
//!
//! Wraps `indicatif` with the single bar relfetch needs: a 50-cell download bar
//! showing percentage and transferred size in MiB, redrawn as chunks arrive.
//!
//! # Hidden Bars
//!
//! The bar is hidden, and every update becomes a no-op, when:
//! - quiet mode was requested
//! - the server did not report a content length, or reported zero
//! - the `RELFETCH_NO_PROGRESS` environment variable is set
//!
//! # Example Output
//!
//! ```text
//! [==========================>                       ]  53% (12.40 MiB / 23.35 MiB)
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

/// Environment variable that disables progress output.
pub const NO_PROGRESS_ENV: &str = "RELFETCH_NO_PROGRESS";

/// Width of the bar in cells.
pub const BAR_WIDTH: usize = 50;

/// Checks if progress bars are disabled through [`NO_PROGRESS_ENV`].
fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// Progress bar for a single streamed download.
pub struct DownloadProgress {
    inner: IndicatifBar,
}

impl DownloadProgress {
    /// Creates a bar for a body of `total` bytes.
    ///
    /// Returns a hidden bar when `quiet` is set, when `total` is unknown or zero,
    /// or when progress is disabled through the environment.
    pub fn new(total: Option<u64>, quiet: bool) -> Self {
        let inner = match total {
            Some(len) if len > 0 && !quiet && !is_progress_disabled() => {
                let bar = IndicatifBar::new(len);
                bar.set_style(download_style());
                bar
            }
            _ => IndicatifBar::hidden(),
        };
        Self { inner }
    }

    /// Whether updates are being drawn.
    pub fn is_visible(&self) -> bool {
        !self.inner.is_hidden()
    }

    /// Advances the bar by `delta` bytes.
    pub fn inc(&self, delta: u64) {
        self.inner.inc(delta);
    }

    /// Bytes reported so far.
    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Leaves the completed bar on screen.
    pub fn finish(&self) {
        self.inner.finish();
    }

    /// Removes the bar, used when the download fails part way.
    pub fn abandon(&self) {
        self.inner.abandon();
    }
}

fn download_style() -> IndicatifStyle {
    let template = format!("[{{bar:{BAR_WIDTH}}}] {{percent:>3}}% ({{binary_bytes}} / {{binary_total_bytes}})");
    IndicatifStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| IndicatifStyle::default_bar())
        .progress_chars("=> ")
}
