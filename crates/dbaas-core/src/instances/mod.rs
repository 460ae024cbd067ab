//! Database instances
//!
//! Build a request with [`CreateOpts`], then call one of the operation
//! functions with any [`ServiceClient`](crate::client::ServiceClient).

pub mod params;
pub mod requests;
pub mod results;
pub mod urls;

pub use params::*;
pub use requests::*;
pub use results::*;
