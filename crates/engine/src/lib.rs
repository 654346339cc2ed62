//! Subdocument engine for docmock
//!
//! This crate applies a single path operation to a JSON document:
//! - Operation: the eleven lookups and mutators and their properties
//! - Executor: parse, navigate, mutate, re-serialize
//!
//! The engine is pure. It never sees keys, CAS values or storage; the
//! executor crate wires it to a [`docmock_core::DocumentStore`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod executor;
mod input;
mod navigate;
pub mod operation;

pub use executor::{execute, execute_path, root_type, ExecutionResult};
pub use operation::Operation;
