//! Whether a run has work to do.

use crate::config::PersistedState;

/// How the tool was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// At least one flag was given on the command line
    Explicit,
    /// No flags at all, e.g. from cron
    Unattended,
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Download (and possibly install)
    Proceed,
    /// The persisted version already matches; do nothing
    UpToDate,
}

/// Decide whether to proceed.
///
/// Only unattended runs are ever skipped, and only when the resolved version
/// equals the persisted one and neither `forced` nor `install_requested` is set.
/// Explicit runs always proceed.
pub fn decide(
    mode: RunMode,
    forced: bool,
    install_requested: bool,
    persisted: &PersistedState,
    resolved_version: &str,
) -> Decision {
    let same_version = !persisted.last_version.is_empty() && persisted.last_version == resolved_version;

    if mode == RunMode::Unattended && same_version && !forced && !install_requested {
        Decision::UpToDate
    } else {
        Decision::Proceed
    }
}
