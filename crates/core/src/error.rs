//! Error types for the subdocument mock
//!
//! Two closed sets live here:
//! - [`SubdocError`]: every way a subdocument operation can fail against a
//!   document. Each variant maps to exactly one wire status.
//! - [`StoreError`]: every way the document store can refuse a write.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

use crate::json::PathParseError;

/// Result type alias for subdocument execution
pub type SubdocResult<T> = std::result::Result<T, SubdocError>;

/// Faults raised by the subdocument engine
///
/// # Categories
///
/// | Category | Variants |
/// |----------|----------|
/// | Path | `PathNotFound`, `PathExists`, `PathMismatch`, `PathInvalid`, `PathParse`, `PathTooBig` |
/// | Document | `DocNotJson`, `DocTooDeep` |
/// | Value | `CannotInsert`, `ValueTooDeep` |
/// | Counter | `BadNumber`, `NumberTooBig`, `DeltaTooBig`, `ZeroDelta` |
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubdocError {
    /// Addressed location is absent and may not be created
    #[error("path not found")]
    PathNotFound,

    /// Addressed location is present where the operation requires absence
    #[error("path already exists")]
    PathExists,

    /// A step needed one container kind and found another value
    #[error("path mismatch: expected {expected}, found {found}")]
    PathMismatch {
        /// Container kind the step required
        expected: &'static str,
        /// Type actually present
        found: &'static str,
    },

    /// Path is well formed but not usable with this operation
    #[error("invalid path: {reason}")]
    PathInvalid {
        /// Why the path was refused
        reason: &'static str,
    },

    /// Path text could not be parsed
    #[error("path parse error: {0}")]
    PathParse(PathParseError),

    /// Path exceeds the length or component limit
    #[error("path too big")]
    PathTooBig,

    /// Target buffer is not valid JSON
    #[error("document is not JSON")]
    DocNotJson,

    /// Existing document is nested too deeply to operate on
    #[error("document too deep")]
    DocTooDeep,

    /// Input value is malformed for its target context
    #[error("value cannot be inserted: {reason}")]
    CannotInsert {
        /// Why the value was refused
        reason: &'static str,
    },

    /// The mutation would nest the document too deeply
    #[error("value would make the document too deep")]
    ValueTooDeep,

    /// Existing counter value is not a valid integer
    #[error("existing value is not a valid integer")]
    BadNumber,

    /// Counter result leaves the signed 64-bit range
    #[error("counter result out of range")]
    NumberTooBig,

    /// Counter delta is longer than the accepted bound
    #[error("delta out of range")]
    DeltaTooBig,

    /// Counter delta is zero
    #[error("delta must not be zero")]
    ZeroDelta,
}

impl From<PathParseError> for SubdocError {
    fn from(err: PathParseError) -> Self {
        match err {
            PathParseError::TooLong { .. } | PathParseError::TooManyComponents { .. } => {
                SubdocError::PathTooBig
            }
            other => SubdocError::PathParse(other),
        }
    }
}

/// Write refusals reported by a [`DocumentStore`](crate::traits::DocumentStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `add` found the key already present
    #[error("key already exists")]
    KeyExists,

    /// `replace` found no document under the key
    #[error("key not found")]
    KeyNotFound,

    /// `replace` expected a different CAS
    #[error("CAS mismatch: expected {expected}, current {actual}")]
    CasMismatch {
        /// CAS the caller expected
        expected: u64,
        /// CAS currently stored
        actual: u64,
    },

    /// The document is locked by another client
    #[error("key is locked")]
    Locked,
}
