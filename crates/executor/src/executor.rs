//! The command orchestrator - wires subdocument commands to the store.
//!
//! Each command runs as an optimistic read-compute-write cycle: fetch the
//! document, run the engine on the addressed buffer, write the result back
//! under the CAS that was read. Only a lost document-creation race is
//! retried; every other refusal is answered as-is.

use std::sync::Arc;

use docmock_core::{Datatype, Document, DocumentStore, JsonPath, StoreError, SubdocError};
use docmock_engine::{execute_path, root_type, ExecutionResult, Operation};
use tracing::{debug, warn};

use crate::command::{DocFlags, PathFlags, SubdocCommand};
use crate::config::MockConfig;
use crate::error::{Error, Result};
use crate::response::Response;
use crate::status::Status;

/// Outcome of one read-compute-write attempt
enum Attempt {
    Done(Response),
    /// `add` lost to a concurrent creator
    CreateRace,
}

/// Executes subdocument commands against a [`DocumentStore`]
///
/// # Thread Safety
///
/// `SubdocCommandExecutor` is `Send + Sync` and can be shared across threads.
/// It holds no per-command state; all atomicity is delegated to the store.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use docmock_executor::{MockConfig, Opcode, SubdocCommand, SubdocCommandExecutor};
/// use docmock_storage::MemoryStore;
///
/// let executor = SubdocCommandExecutor::new(Arc::new(MemoryStore::new()), MockConfig::default());
/// let cmd = SubdocCommand::new("user::1", Opcode::Get, "name");
/// let response = executor.execute(&cmd)?;
/// ```
pub struct SubdocCommandExecutor {
    store: Arc<dyn DocumentStore>,
    config: MockConfig,
}

impl SubdocCommandExecutor {
    /// Create an executor over `store`
    pub fn new(store: Arc<dyn DocumentStore>, config: MockConfig) -> Self {
        Self { store, config }
    }

    /// Configuration in effect
    pub fn config(&self) -> &MockConfig {
        &self.config
    }

    /// Execute a single command.
    ///
    /// Every protocol-level outcome, including failures, is an `Ok`
    /// response carrying a [`Status`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Internal` if the store answers in a way its contract
    /// rules out.
    pub fn execute(&self, cmd: &SubdocCommand) -> Result<Response> {
        let op = cmd.operation();

        if cmd.doc_flags.creates() && !op.is_creative() {
            return Ok(self.respond(cmd, Response::status(Status::InvalidArguments)));
        }

        let path: JsonPath = match cmd.path.parse() {
            Ok(path) => path,
            Err(e) => return Ok(self.fault(cmd, &SubdocError::from(e))),
        };

        let value = if op.needs_value() {
            match std::str::from_utf8(&cmd.value) {
                Ok(text) => Some(text),
                Err(_) => {
                    let fault = SubdocError::CannotInsert {
                        reason: "value is not valid UTF-8",
                    };
                    return Ok(self.fault(cmd, &fault));
                }
            }
        } else {
            None
        };

        for attempt in 0..=self.config.max_create_retries {
            match self.attempt(cmd, op, &path, value)? {
                Attempt::Done(response) => return Ok(self.respond(cmd, response)),
                Attempt::CreateRace => {
                    debug!(target: "docmock::executor", key = %cmd.key, attempt, "Lost document creation race, retrying");
                }
            }
        }

        warn!(
            target: "docmock::executor",
            key = %cmd.key,
            retries = self.config.max_create_retries,
            "Document creation retries exhausted"
        );
        Ok(self.respond(cmd, Response::status(Status::TemporaryFailure)))
    }

    fn attempt(
        &self,
        cmd: &SubdocCommand,
        op: Operation,
        path: &JsonPath,
        value: Option<&str>,
    ) -> Result<Attempt> {
        let xattr = cmd.targets_xattr();

        let (doc, creating) = match self.store.get(&cmd.key) {
            Some(doc) => {
                if cmd.doc_flags.contains(DocFlags::ADD) {
                    return Ok(Attempt::Done(Response::status(Status::KeyExists)));
                }
                (doc, false)
            }
            None if !cmd.doc_flags.creates() => {
                return Ok(Attempt::Done(Response::status(Status::KeyNotFound)));
            }
            None => match root_type(&cmd.path, op) {
                Ok(Some(seed)) => (seed_document(&cmd.key, seed, xattr), true),
                Ok(None) => return Ok(Attempt::Done(Response::status(Status::KeyNotFound))),
                Err(fault) => return Ok(Attempt::Done(Response::status(Status::from(&fault)))),
            },
        };

        let expected_cas = if cmd.cas != 0 { cmd.cas } else { doc.cas };
        let mkdir_p = cmd.doc_flags.creates() || cmd.path_flags.contains(PathFlags::MKDIR_P);

        let outcome = target_text(&doc, xattr)
            .and_then(|text| execute_path(text, path, op, value, mkdir_p));
        let result = match outcome {
            Ok(result) => result,
            Err(fault) => return Ok(Attempt::Done(Response::status(Status::from(&fault)))),
        };

        if op.is_lookup() {
            return Ok(Attempt::Done(lookup_response(op, &doc, result)));
        }

        let matched = result.match_str().map(str::to_owned);
        let Some(new_text) = result.into_new_doc() else {
            return Err(Error::internal(format!("{} produced no document", op)));
        };

        let body_len = if xattr { doc.body_len() } else { new_text.len() };
        if body_len > self.config.item_size_max {
            return Ok(Attempt::Done(Response::status(Status::TooBig)));
        }

        let replacement = assemble(&doc, new_text, xattr, cmd.expiry);
        let written = if creating {
            match self.store.add(replacement) {
                Ok(info) => info,
                Err(StoreError::KeyExists) => return Ok(Attempt::CreateRace),
                Err(e) => {
                    warn!(target: "docmock::executor", key = %cmd.key, error = %e, "Store add answered unexpectedly");
                    return Err(Error::internal(format!("add answered: {}", e)));
                }
            }
        } else {
            match self.store.replace(replacement, expected_cas) {
                Ok(info) => info,
                Err(e) => {
                    let status = Status::from_store_error(&e, cmd.features.xerror);
                    return Ok(Attempt::Done(Response::status(status)));
                }
            }
        };

        let mut response = Response::success(written.cas);
        if op.returns_match() {
            if let Some(matched) = matched {
                response = response.with_value(matched);
            }
        }
        if cmd.features.mutation_tokens {
            response = response.with_token(written.token);
        }
        Ok(Attempt::Done(response))
    }

    fn fault(&self, cmd: &SubdocCommand, fault: &SubdocError) -> Response {
        self.respond(cmd, Response::status(Status::from(fault)))
    }

    fn respond(&self, cmd: &SubdocCommand, response: Response) -> Response {
        debug!(
            target: "docmock::executor",
            key = %cmd.key,
            opcode = %cmd.opcode,
            path = %cmd.path,
            status = %response.status,
            "Subdoc command answered"
        );
        response
    }
}

fn seed_document(key: &str, seed: &str, xattr: bool) -> Document {
    let doc = Document::empty(key);
    if xattr {
        doc.with_xattr(seed)
    } else {
        Document {
            body: Some(seed.as_bytes().to_vec()),
            ..doc
        }
    }
}

/// Text of the buffer the command addresses
///
/// An absent xattr buffer reads as `{}`, an absent body as empty text.
fn target_text(doc: &Document, xattr: bool) -> std::result::Result<&str, SubdocError> {
    let (bytes, default) = if xattr {
        (doc.xattr.as_deref(), "{}")
    } else {
        (doc.body.as_deref(), "")
    };
    match bytes {
        None => Ok(default),
        Some(bytes) => std::str::from_utf8(bytes).map_err(|_| SubdocError::DocNotJson),
    }
}

fn lookup_response(op: Operation, doc: &Document, result: ExecutionResult) -> Response {
    if op == Operation::Exists && !result.exists() {
        return Response::status(Status::SubdocPathNotFound);
    }
    let response = Response::success(doc.cas);
    match result.match_str() {
        Some(matched) => response.with_value(matched),
        None => response,
    }
}

/// Build the document to write back: the new buffer, its sibling carried
/// through, the existing flags and the command's expiry
fn assemble(doc: &Document, new_text: String, xattr: bool, expiry: u32) -> Document {
    let (body, xattr_buf) = if xattr {
        (doc.body.clone(), Some(new_text.into_bytes()))
    } else {
        (Some(new_text.into_bytes()), doc.xattr.clone())
    };
    let body_is_json = !xattr || doc.datatype.contains(Datatype::JSON);
    let mut datatype = if body_is_json && body.is_some() {
        Datatype::JSON
    } else {
        Datatype::RAW
    };
    if xattr_buf.is_some() {
        datatype |= Datatype::XATTR;
    }
    Document {
        key: doc.key.clone(),
        body,
        xattr: xattr_buf,
        flags: doc.flags,
        expiry,
        cas: 0,
        datatype,
    }
}
