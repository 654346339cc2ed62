//! Query request failures
//!
//! Every variant knows the HTTP status it is answered with and, for
//! service-level errors, the query error code placed in the body.

use thiserror::Error;

/// Why a query request was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Only POST is served
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Body is not a JSON object
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An installed error injection matched the request
    #[error("{message}")]
    Injected {
        /// Message reported to the client
        message: String,
        /// Query error code reported to the client
        code: i64,
    },

    /// Statement is not in the canned table
    #[error("keyspace not found")]
    KeyspaceNotFound,

    /// Prepared request lacks `prepared` or `encoded_plan`
    #[error("missing field")]
    MissingField,

    /// `encoded_plan` is not a base64 encoded plan
    #[error("could not decode base64")]
    BadEncodedPlan,

    /// Plan was prepared before the last index reset
    #[error("index deleted or node hosting the index is down - cause: queryport.indexNotFound")]
    IndexNotFound,
}

impl QueryError {
    /// HTTP status the error is answered with
    pub fn http_status(&self) -> u16 {
        match self {
            QueryError::MethodNotAllowed(_) => 405,
            QueryError::BadRequest(_) => 400,
            _ => 500,
        }
    }

    /// Query error code, for errors reported in a JSON `errors` body
    pub fn code(&self) -> Option<i64> {
        match self {
            QueryError::MethodNotAllowed(_) | QueryError::BadRequest(_) => None,
            QueryError::Injected { code, .. } => Some(*code),
            QueryError::KeyspaceNotFound => Some(12003),
            QueryError::MissingField => Some(4040),
            QueryError::BadEncodedPlan => Some(4070),
            QueryError::IndexNotFound => Some(5000),
        }
    }
}
