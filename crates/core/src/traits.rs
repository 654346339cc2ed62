//! Store abstraction consumed by the command layer
//!
//! The command layer never owns documents; it reads them, computes a new
//! version and asks the store to install it. All atomicity lives behind
//! this trait.

use crate::error::StoreError;
use crate::types::{Document, MutationInfo};

/// Document store with CAS semantics
///
/// Thread safety: All methods must be safe to call concurrently from
/// multiple threads (requires Send + Sync).
///
/// # Contract
///
/// - `add` is atomic create-if-absent.
/// - `replace` is atomic compare-and-swap on the document CAS.
/// - Every successful write assigns a fresh CAS.
pub trait DocumentStore: Send + Sync {
    /// Get the current document for a key
    ///
    /// Returns None if the key doesn't exist.
    fn get(&self, key: &str) -> Option<Document>;

    /// Insert a document that must not exist yet
    ///
    /// # Errors
    ///
    /// Returns `StoreError::KeyExists` if another document holds the key.
    fn add(&self, doc: Document) -> Result<MutationInfo, StoreError>;

    /// Replace an existing document if its CAS still equals `expected_cas`
    ///
    /// # Errors
    ///
    /// - `StoreError::KeyNotFound` if the key is absent
    /// - `StoreError::CasMismatch` if the stored CAS differs
    /// - `StoreError::Locked` if the document is locked under another CAS
    fn replace(&self, doc: Document, expected_cas: u64) -> Result<MutationInfo, StoreError>;
}
