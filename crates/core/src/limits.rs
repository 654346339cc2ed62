//! Protocol limits
//!
//! These values mirror what a real data node enforces, so clients see the
//! same failures against the mock as against a cluster.

/// Maximum subdocument path length in bytes
pub const MAX_PATH_BYTES: usize = 1024;

/// Maximum number of components in a subdocument path
pub const MAX_PATH_COMPONENTS: usize = 32;

/// Maximum nesting depth of a document (or a value inserted into one)
pub const MAX_NESTING_DEPTH: usize = 32;

/// Default maximum size of a document body in bytes (20 MiB)
///
/// Extended attributes do not count against this limit.
pub const DEFAULT_ITEM_SIZE_MAX: usize = 20 * 1024 * 1024;

/// Maximum number of significant digits accepted in a counter delta
pub const MAX_DELTA_DIGITS: usize = 19;
