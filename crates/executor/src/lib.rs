//! # docmock Executor
//!
//! The command layer of the mock: it turns decoded subdocument requests
//! into store reads, engine runs and CAS write-backs, and answers every
//! outcome with a protocol-accurate status.
//!
//! - [`SubdocCommandExecutor`] - runs a [`SubdocCommand`] against a store
//! - [`Status`] - wire status codes and the fault translation table
//! - [`MockConfig`] - size limit, retry bound and vbucket count
//!
//! ## Quick Start
//!
//! ```text
//! use docmock_executor::{DocFlags, MockConfig, Opcode, SubdocCommand, SubdocCommandExecutor};
//!
//! let executor = SubdocCommandExecutor::new(store, MockConfig::default());
//! let cmd = SubdocCommand::new("user::1", Opcode::DictUpsert, "profile.name")
//!     .with_value("\"Ada\"")
//!     .with_doc_flags(DocFlags::MKDOC);
//! let response = executor.execute(&cmd)?;
//! assert!(response.is_success());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod command;
mod config;
mod error;
mod executor;
mod response;
mod status;

pub use command::{ClientFeatures, DocFlags, Opcode, PathFlags, SubdocCommand};
pub use config::{MockConfig, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use executor::SubdocCommandExecutor;
pub use response::Response;
pub use status::Status;
