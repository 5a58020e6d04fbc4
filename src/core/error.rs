//! Error handling for relfetch
//!
//! This module provides the error taxonomy for every phase of a fetch run and the
//! user-friendly rendering used by the CLI. The error system follows two rules:
//! 1. **Strongly-typed errors** from each component, so callers and tests can match
//!    on the exact failure (for example a rejected archive entry)
//! 2. **User-friendly messages** with actionable suggestions when printed
//!
//! # Architecture
//!
//! - [`FetchError`] - Enumerated failure modes of resolution, download, extraction
//!   and installation
//! - [`ErrorContext`] - Wrapper that adds a suggestion and details for display
//!
//! Components return `Result<T, FetchError>`. The orchestration layer wraps them in
//! [`anyhow::Error`] with phase context, and [`user_friendly_error`] digs the typed
//! error back out when presenting it.
//!
//! # Fatal vs non-fatal
//!
//! State-file problems are reported as warnings and never abort a run.
//! [`FetchError::ConfigMalformed`] is only ever logged. Everything else is fatal.
//!
//! # Examples
//!
//! ```rust,no_run
//! use relfetch::core::{FetchError, user_friendly_error};
//!
//! let error = FetchError::EmptyVersion {
//!     url: "https://checkpoint.example.com/v1/check/tool".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows coloured error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for every relfetch component.
///
/// Each variant corresponds to one failure class of the fetch pipeline.
///
/// ## Remote
/// - [`Network`](FetchError::Network) - transport-level failure
/// - [`HttpStatus`](FetchError::HttpStatus) - non-success response code
/// - [`Decode`](FetchError::Decode) - malformed JSON from the checkpoint service
/// - [`EmptyVersion`](FetchError::EmptyVersion) - checkpoint response carried no version
///
/// ## Local
/// - [`Io`](FetchError::Io) - read, write, permission or missing-path failures
/// - [`PathTraversal`](FetchError::PathTraversal) - archive entry escapes its destination
/// - [`BinaryNotFound`](FetchError::BinaryNotFound) - expected executable missing from the archive
/// - [`ConfigMalformed`](FetchError::ConfigMalformed) - skipped state-file line (never propagated)
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP request could not be completed.
    ///
    /// Covers DNS failures, refused connections, TLS errors, timeouts and
    /// connections dropped while the body was being read.
    #[error("Network error while fetching {url}: {reason}")]
    Network {
        /// The URL being requested
        url: String,
        /// Transport error description
        reason: String,
    },

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The URL being requested
        url: String,
        /// The numeric status code returned
        status: u16,
    },

    /// The checkpoint response body was not valid JSON of the expected shape.
    #[error("Failed to decode version information from {url}: {reason}")]
    Decode {
        /// The checkpoint URL
        url: String,
        /// Parser error description
        reason: String,
    },

    /// The checkpoint response did not contain a usable `current_version`.
    #[error("No version found in response from {url}")]
    EmptyVersion {
        /// The checkpoint URL
        url: String,
    },

    /// A local filesystem operation failed.
    #[error("Failed to {operation} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g. "create file", "read archive")
        operation: String,
        /// The path involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An archive entry resolves to a location outside the extraction root.
    ///
    /// Always fatal. Raised before the offending entry is written.
    #[error("Illegal file path in archive: '{entry}' escapes {}", destination.display())]
    PathTraversal {
        /// The raw entry name stored in the archive
        entry: String,
        /// The extraction root the entry tried to escape
        destination: PathBuf,
    },

    /// The extracted archive does not contain the expected executable.
    #[error("Binary '{name}' not found in archive contents at {}", searched.display())]
    BinaryNotFound {
        /// The executable file name that was expected
        name: String,
        /// The directory that was searched
        searched: PathBuf,
    },

    /// A state-file line could not be interpreted and was skipped.
    #[error("Skipping malformed line {line_number} in {}: {line:?}", path.display())]
    ConfigMalformed {
        /// The state file
        path: PathBuf,
        /// 1-based line number
        line_number: usize,
        /// The raw line content
        line: String,
    },
}

impl FetchError {
    /// Build an [`FetchError::Io`] from an operation description, path and source.
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Map a `reqwest` transport error for `url` to [`FetchError::Network`].
    pub fn network(url: &str, error: &reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

/// Error wrapper carrying a suggestion and details for CLI display.
///
/// Suggestions should be actionable steps; details explain why the error occurred.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error, already rendered
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context for `message` with no suggestion or details.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// The outermost context (the failed phase, e.g. "Failed to download archive") is
/// kept as the headline. If a [`FetchError`] is found anywhere in the chain, its
/// tailored suggestion and details are attached. Otherwise the full cause chain is
/// listed.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let headline = error.to_string();

    if let Some(fetch_error) = error.chain().find_map(|e| e.downcast_ref::<FetchError>()) {
        let message = if headline == fetch_error.to_string() {
            headline
        } else {
            format!("{headline}: {fetch_error}")
        };
        return create_error_context(fetch_error, message);
    }

    if let Some(io_error) = error.chain().find_map(|e| e.downcast_ref::<io::Error>()) {
        if io_error.kind() == io::ErrorKind::PermissionDenied {
            return ErrorContext::new(render_chain(&error))
                .with_suggestion("Try running with elevated permissions (sudo/Administrator) or check file ownership")
                .with_details("relfetch does not have permission to read or write a required file");
        }
    }

    ErrorContext::new(render_chain(&error))
}

fn render_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

/// Map each [`FetchError`] variant to its suggestion and details.
fn create_error_context(error: &FetchError, message: String) -> ErrorContext {
    let ctx = ErrorContext::new(message);
    match error {
        FetchError::Network { .. } => ctx
            .with_suggestion("Check your internet connection. If you are behind a proxy, set https_proxy or HTTPS_PROXY")
            .with_details("The request did not complete; nothing was retried"),

        FetchError::HttpStatus { status, .. } if *status == 404 => ctx
            .with_suggestion("Check that the requested version exists for this OS and architecture (see --ver, --os, --arch)")
            .with_details("The release server has no archive at that location"),

        FetchError::HttpStatus { .. } => ctx
            .with_suggestion("The release server returned an error. Try again later")
            .with_details("Only a success response is accepted; any partially written file should be discarded"),

        FetchError::Decode { .. } => ctx
            .with_suggestion("Pin a version explicitly with --ver to skip the version lookup")
            .with_details("The version service returned a response that is not the expected JSON document"),

        FetchError::EmptyVersion { .. } => ctx
            .with_suggestion("Pin a version explicitly with --ver to skip the version lookup")
            .with_details("The version service response had no current_version field"),

        FetchError::Io { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => ctx
            .with_suggestion("Check write permissions on the target directory, or choose another --install-path")
            .with_details("relfetch does not have permission to write there"),

        FetchError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound => ctx
            .with_suggestion("Check that the directory exists and the path is correct")
            .with_details("A required file or directory could not be found"),

        FetchError::Io { .. } => ctx
            .with_suggestion("Check available disk space and filesystem permissions"),

        FetchError::PathTraversal { .. } => ctx
            .with_suggestion("Do not use this archive. Verify the download source")
            .with_details("The archive contains an entry that would be written outside the extraction directory"),

        FetchError::BinaryNotFound { .. } => ctx
            .with_suggestion("Check that --os matches the archive contents and that the product name is correct (RELFETCH_PRODUCT)")
            .with_details("The archive was extracted but the expected executable is not at its top level"),

        FetchError::ConfigMalformed { .. } => ctx
            .with_suggestion("Edit or delete the state file; it is regenerated on the next successful run"),
    }
}
