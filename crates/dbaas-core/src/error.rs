//! Unified error handling for dbaas-core
//!
//! Validation failures are raised locally before any request is sent.
//! Transport and protocol failures come from the [`ServiceClient`] and are
//! passed through untouched.
//!
//! # Example
//!
//! ```rust
//! use dbaas_core::Error;
//!
//! fn describe(err: &Error) -> &'static str {
//!     if err.is_validation() {
//!         "fix the request"
//!     } else if err.is_not_found() {
//!         "no such instance"
//!     } else {
//!         "remote failure"
//!     }
//! }
//!
//! let err = Error::missing_input("instances::CreateOpts::flavor_ref");
//! assert_eq!(describe(&err), "fix the request");
//! ```
//!
//! [`ServiceClient`]: crate::client::ServiceClient

use std::fmt::Display;

use thiserror::Error;

use crate::client::Method;
use crate::config::ConfigError;

/// Core error type for all instance operations
#[derive(Error, Debug)]
pub enum Error {
    /// A supplied value violates a documented constraint
    #[error("Invalid input provided for argument [{argument}]: [{value}], {info}")]
    InvalidInput {
        argument: String,
        value: String,
        info: String,
    },

    /// A required value was empty or absent
    #[error("Missing input for argument [{argument}]")]
    MissingInput { argument: String },

    /// The service answered with a status outside the accepted set
    #[error(
        "Expected HTTP response code {expected:?} when accessing [{method} {url}], but got {actual} instead: {body}"
    )]
    UnexpectedStatus {
        method: Method,
        url: String,
        expected: Vec<u16>,
        actual: u16,
        body: String,
    },

    /// Connection, TLS or timeout failure in the transport
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded into the requested shape
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint or resource URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an invalid-input error naming the argument, the rejected value
    /// and the constraint it violated
    pub fn invalid_input(
        argument: impl Into<String>,
        value: impl Display,
        info: impl Into<String>,
    ) -> Self {
        Error::InvalidInput {
            argument: argument.into(),
            value: value.to_string(),
            info: info.into(),
        }
    }

    /// Build a missing-input error naming the argument
    pub fn missing_input(argument: impl Into<String>) -> Self {
        Error::MissingInput {
            argument: argument.into(),
        }
    }

    /// Name of the offending argument for validation errors
    #[must_use]
    pub fn argument(&self) -> Option<&str> {
        match self {
            Error::InvalidInput { argument, .. } | Error::MissingInput { argument } => {
                Some(argument)
            }
            _ => None,
        }
    }

    /// Returns true if the error was raised before any request was sent
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput { .. } | Error::MissingInput { .. })
    }

    /// HTTP status code reported by the service, if any
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { actual, .. } => Some(*actual),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }

    /// Returns true if this is a conflict error (409)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status_code() == Some(409)
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(500..=599))
    }

    /// Returns true if the transport gave up waiting for the service
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }
}
