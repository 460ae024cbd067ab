//! Client configuration for the database service
//!
// Allow nested config module - this is intentional for the config subsystem

#![allow(clippy::module_inception)]
//!
//! A configuration file names the service endpoint and transport settings
//! used by [`HttpServiceClient`](crate::http::HttpServiceClient). It carries
//! no credentials: pre-issued tokens may be forwarded through `headers`, but
//! nothing here obtains or stores them.
//!
//! ```toml
//! endpoint = "https://db.example.com/v1.0/${PROJECT_ID}"
//! timeout_secs = 60
//!
//! [headers]
//! X-Auth-Token = "${OS_TOKEN}"
//! ```

pub mod config;
pub mod error;

pub use config::ClientConfig;
pub use error::ConfigError;
