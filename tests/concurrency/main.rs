//! Concurrency Integration Tests
//!
//! Optimistic concurrency through the command layer with real threads
//! against the in-memory store.

#[path = "../common/mod.rs"]
mod common;

mod cas_conflicts;
mod create_race;
