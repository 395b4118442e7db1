//! Error types for the routing library.
//!
//! Errors only surface while routes are being *registered* or while the
//! configuration is being loaded. Dispatch never fails: an unmatched request is
//! reported as `false`/`None` together with a 404 status on the response sink.
//!
//! # Design
//!
//! This module uses an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern, so internal error sources can change
//! without breaking consumers.
//!
//! # Example
//!
//! ```rust
//! use route_core::{Error, ErrorKind};
//!
//! let error = Error::invalid_pattern("route pattern must not contain '#'");
//!
//! match error.kind() {
//!     ErrorKind::InvalidPattern => println!("Bad route: {}", error),
//!     ErrorKind::Configuration => println!("Bad config: {}", error),
//!     _ => println!("Other error: {}", error),
//! }
//!
//! assert_eq!(error.error_code(), "INVALID_PATTERN");
//! ```

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred.
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// in future versions without breaking existing code. Always include a
/// wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Configuration error (invalid TOML, missing values).
    #[error("configuration error")]
    Configuration,

    /// I/O error (reading configuration files).
    #[error("I/O error")]
    Io,

    /// A URL schema or parameter rule that cannot be compiled.
    #[error("invalid pattern")]
    InvalidPattern,

    /// Invalid input (unknown route or group identifiers, bad arguments).
    #[error("invalid input")]
    InvalidInput,

    /// Internal/unexpected error.
    #[error("internal error")]
    Internal,
}

/// An error that can occur while configuring or registering routes.
///
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// ```rust
/// use route_core::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::Internal, "something went wrong");
/// assert_eq!(err.kind(), ErrorKind::Internal);
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns a stable identifier for this error, suitable for logs and
    /// programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::InvalidPattern => "INVALID_PATTERN",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Consumes the error and returns the inner error source.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an I/O error from a message.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, msg.into())
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPattern, msg.into())
    }

    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Self::new(ErrorKind::InvalidPattern, err)
    }
}

// ============================================================================
// Tests
// ============================================================================
