//! # dbaas-core
//!
//! Client bindings for provisioning and managing managed-database instances.
//!
//! The crate turns typed options into request payloads, validates them, and
//! maps service responses onto typed results. It does not wait for instances
//! to become ready, retry failed calls, or manage credentials.
//!
//! ## Layers
//!
//! - **Options** ([`instances::CreateOpts`] and the sub-option structs,
//!   [`databases`], [`users`]) build and validate payloads.
//! - **Operations** ([`instances::create`], [`instances::get`],
//!   [`instances::restart`], ...) send one request each through a
//!   [`ServiceClient`].
//! - **Transport** ([`HttpServiceClient`]) is the default `reqwest`-backed
//!   [`ServiceClient`], configured from a [`ClientConfig`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbaas_core::instances::{self, CreateOpts, DatastoreOpts};
//! use dbaas_core::{ClientConfig, HttpServiceClient};
//!
//! # async fn run() -> dbaas_core::Result<()> {
//! let config = ClientConfig::load()?;
//! let client = HttpServiceClient::from_config(&config)?;
//!
//! let opts = CreateOpts::new("1", 5)
//!     .with_name("orders")
//!     .with_datastore(DatastoreOpts::new("postgresql", "16"));
//! let instance = instances::create(&client, &opts).await?.extract()?;
//!
//! instances::resize_volume(&client, &instance.id, 10).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod databases;
pub mod error;
pub mod http;
pub mod instances;
pub mod pagination;
pub mod users;

pub use client::{ApiRequest, ApiResponse, Headers, JsonMap, Method, RequestOpts, ServiceClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{Error, Result};
pub use http::HttpServiceClient;
pub use pagination::{Page, Pager};
