//! docmock - protocol-accurate mock of a document database
//!
//! docmock answers subdocument commands (path-addressed lookups and
//! mutations inside JSON documents) and query requests the way a real
//! cluster node would, so client libraries can be tested without one.
//!
//! # Quick Start
//!
//! ```ignore
//! use docmock::{DocFlags, Mock, MockConfig, Opcode, Status, SubdocCommand};
//!
//! let mock = Mock::new(MockConfig::default());
//!
//! let cmd = SubdocCommand::new("user::1", Opcode::DictUpsert, "profile.name")
//!     .with_value("\"Ada\"")
//!     .with_doc_flags(DocFlags::MKDOC);
//! assert_eq!(mock.execute(&cmd)?.status, Status::Success);
//! ```
//!
//! # Architecture
//!
//! | Layer | Crate |
//! |-------|-------|
//! | Path parser, faults, document types | `docmock-core` |
//! | Subdocument executor | `docmock-engine` |
//! | In-memory CAS store | `docmock-storage` |
//! | Command orchestrator, status codes, config | `docmock-executor` |
//! | Query service | `docmock-query` |

use std::sync::Arc;

pub use docmock_core::{
    Datatype, Document, DocumentStore, JsonPath, MutationInfo, MutationToken, PathParseError,
    PathSegment, StoreError, SubdocError, SubdocResult,
};
pub use docmock_engine::{execute, root_type, ExecutionResult, Operation};
pub use docmock_executor::*;
pub use docmock_query::{ErrorInjection, QueryError, QueryResponse, QueryService};
pub use docmock_storage::MemoryStore;

/// A complete mock node: one in-memory store, the subdocument command
/// layer over it, and the query service
pub struct Mock {
    store: Arc<MemoryStore>,
    executor: SubdocCommandExecutor,
    query: QueryService,
}

impl Mock {
    /// Build a mock from its configuration
    pub fn new(config: MockConfig) -> Self {
        let store = Arc::new(MemoryStore::with_vbuckets(config.num_vbuckets));
        let executor = SubdocCommandExecutor::new(store.clone(), config);
        Mock {
            store,
            executor,
            query: QueryService::new(),
        }
    }

    /// Build a mock from a `docmock.toml` file
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read or parsed.
    pub fn from_config_file(path: &std::path::Path) -> Result<Self> {
        Ok(Self::new(MockConfig::from_file(path)?))
    }

    /// Execute one subdocument command
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` only if the store breaks its contract.
    pub fn execute(&self, cmd: &SubdocCommand) -> Result<Response> {
        self.executor.execute(cmd)
    }

    /// The backing store, for seeding and inspecting documents
    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// The query service
    pub fn query(&self) -> &QueryService {
        &self.query
    }

    /// Configuration in effect
    pub fn config(&self) -> &MockConfig {
        self.executor.config()
    }
}

impl Default for Mock {
    fn default() -> Self {
        Self::new(MockConfig::default())
    }
}
