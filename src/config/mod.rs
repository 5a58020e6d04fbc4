//! Configuration for relfetch.
//!
//! Two pieces of configuration drive a run:
//!
//! - [`PersistedState`] - the state file remembering the last version and the
//!   install settings between runs
//! - [`ReleaseSource`] - the product name and the endpoints to fetch from, with
//!   `RELFETCH_*` environment overrides
//!
//! Command-line flags live in [`crate::cli`]; they are resolved into a
//! [`crate::runner::RunRequest`] before anything here is consulted.

pub mod source;
pub mod state;

pub use source::ReleaseSource;
pub use state::PersistedState;
