//! Utility modules shared across relfetch.
//!
//! - [`fs`] - lexical path normalisation and containment checks for extraction
//! - [`http`] - the shared HTTP client with timeout and environment proxies
//! - [`platform`] - host OS/architecture mapped onto release naming
//! - [`progress`] - the download progress bar

pub mod fs;
pub mod http;
pub mod platform;
pub mod progress;

pub use platform::ResolvedTarget;
