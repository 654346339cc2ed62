//! Core types and traits for docmock
//!
//! This crate defines the foundational types used throughout the mock:
//! - JsonPath / PathSegment: Parsed subdocument paths
//! - SubdocError: Closed set of subdocument faults
//! - Document / Datatype / MutationToken: Stored items and write results
//! - DocumentStore: The store contract (get, add, replace with CAS)
//! - Limits: Path, depth and item size limits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod json;
pub mod limits;
pub mod traits;
pub mod types;

pub use error::{StoreError, SubdocError, SubdocResult};
pub use json::{is_scalar, nesting_depth, value_type_name, JsonPath, PathParseError, PathSegment};
pub use limits::{
    DEFAULT_ITEM_SIZE_MAX, MAX_DELTA_DIGITS, MAX_NESTING_DEPTH, MAX_PATH_BYTES,
    MAX_PATH_COMPONENTS,
};
pub use traits::DocumentStore;
pub use types::{Datatype, Document, MutationInfo, MutationToken};
