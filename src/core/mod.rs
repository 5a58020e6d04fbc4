//! Core types for relfetch
//!
//! This module holds the error taxonomy shared by every phase of a fetch run and
//! the helpers that turn those errors into coloured, actionable CLI output.
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`FetchError`] - Enumerated failure modes of resolution, download, extraction
//!   and installation
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any `anyhow::Error` to a displayable context

pub mod error;

pub use error::{ErrorContext, FetchError, user_friendly_error};
