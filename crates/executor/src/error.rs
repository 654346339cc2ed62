//! Error types for command execution.
//!
//! Wire-level failures (path not found, CAS mismatch, ...) are not errors:
//! they are answered with a [`Status`](crate::Status) inside a normal
//! response. [`Error`] covers what the mock cannot answer at all:
//! - **Internal**: the store broke its contract
//! - **Config**: a configuration file could not be read or parsed

use serde::{Deserialize, Serialize};

/// Command layer errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum Error {
    /// The store answered in a way impossible for the call made
    #[error("internal error: {reason}")]
    Internal {
        /// What went wrong
        reason: String,
    },

    /// Configuration could not be loaded
    #[error("config error: {reason}")]
    Config {
        /// What went wrong
        reason: String,
    },
}

impl Error {
    pub(crate) fn internal(reason: impl Into<String>) -> Self {
        Error::Internal {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }
}

/// Result type for command layer operations
pub type Result<T> = std::result::Result<T, Error>;
