//! Query service mock for docmock
//!
//! Request logic only: method check, body parsing, a canned statement
//! table, prepared plan validation and error injection. HTTP framing is
//! left to whoever embeds the service.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod service;

pub use error::QueryError;
pub use service::{ErrorInjection, QueryResponse, QueryService};
