//! Storage layer for docmock
//!
//! This crate implements the document store the command layer runs against:
//! - MemoryStore: DashMap-backed store with CAS, vbucket seqnos and item locks
//!
//! The command layer only sees the [`docmock_core::DocumentStore`] trait;
//! the extra methods here (upsert, remove, locking) are for test setup.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod memory;

pub use memory::{MemoryStore, DEFAULT_NUM_VBUCKETS, LOCKED_CAS};
