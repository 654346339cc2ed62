//! Subdocument wire commands
//!
//! A [`SubdocCommand`] is the decoded form of one single-path subdocument
//! request: everything the orchestrator needs, nothing about framing.

use bitflags::bitflags;
use docmock_engine::Operation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subdocument opcodes as carried in the request header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    /// `SUBDOC_GET`
    Get = 0xc5,
    /// `SUBDOC_EXISTS`
    Exists = 0xc6,
    /// `SUBDOC_DICT_ADD`
    DictAdd = 0xc7,
    /// `SUBDOC_DICT_UPSERT`
    DictUpsert = 0xc8,
    /// `SUBDOC_DELETE`
    Delete = 0xc9,
    /// `SUBDOC_REPLACE`
    Replace = 0xca,
    /// `SUBDOC_ARRAY_PUSH_LAST`
    ArrayPushLast = 0xcb,
    /// `SUBDOC_ARRAY_PUSH_FIRST`
    ArrayPushFirst = 0xcc,
    /// `SUBDOC_ARRAY_INSERT`
    ArrayInsert = 0xcd,
    /// `SUBDOC_ARRAY_ADD_UNIQUE`
    ArrayAddUnique = 0xce,
    /// `SUBDOC_COUNTER`
    Counter = 0xcf,
}

impl Opcode {
    /// Decode a protocol opcode byte
    pub fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0xc5 => Opcode::Get,
            0xc6 => Opcode::Exists,
            0xc7 => Opcode::DictAdd,
            0xc8 => Opcode::DictUpsert,
            0xc9 => Opcode::Delete,
            0xca => Opcode::Replace,
            0xcb => Opcode::ArrayPushLast,
            0xcc => Opcode::ArrayPushFirst,
            0xcd => Opcode::ArrayInsert,
            0xce => Opcode::ArrayAddUnique,
            0xcf => Opcode::Counter,
            _ => return None,
        })
    }

    /// Protocol opcode byte
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Engine operation this opcode runs
    pub fn operation(self) -> Operation {
        match self {
            Opcode::Get => Operation::Get,
            Opcode::Exists => Operation::Exists,
            Opcode::DictAdd => Operation::DictAdd,
            Opcode::DictUpsert => Operation::DictUpsert,
            Opcode::Delete => Operation::Delete,
            Opcode::Replace => Operation::Replace,
            Opcode::ArrayPushLast => Operation::ArrayPushLast,
            Opcode::ArrayPushFirst => Operation::ArrayPushFirst,
            Opcode::ArrayInsert => Operation::ArrayInsert,
            Opcode::ArrayAddUnique => Operation::ArrayAddUnique,
            Opcode::Counter => Operation::Counter,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, u8> {
        Opcode::from_u8(byte).ok_or(byte)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SUBDOC_{}", self.operation())
    }
}

bitflags! {
    /// Per-path flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PathFlags: u8 {
        /// Create missing intermediate containers
        const MKDIR_P = 0x01;
        /// Address the extended attributes instead of the body
        const XATTR = 0x04;
    }
}

bitflags! {
    /// Per-document flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DocFlags: u8 {
        /// Create the document if it does not exist
        const MKDOC = 0x01;
        /// Create the document, failing if it exists
        const ADD = 0x02;
    }
}

impl DocFlags {
    /// True if the request may create the document
    pub fn creates(self) -> bool {
        self.intersects(DocFlags::MKDOC | DocFlags::ADD)
    }
}

/// Features the client negotiated on its connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientFeatures {
    /// Client understands extended error codes
    pub xerror: bool,
    /// Client wants mutation tokens on writes
    pub mutation_tokens: bool,
}

/// One single-path subdocument request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdocCommand {
    /// Document key
    pub key: String,
    /// Operation to run
    pub opcode: Opcode,
    /// Path text
    pub path: String,
    /// Raw operation input
    pub value: Vec<u8>,
    /// Document-level flags
    pub doc_flags: DocFlags,
    /// Path-level flags
    pub path_flags: PathFlags,
    /// Expected CAS, 0 for "whatever is current"
    pub cas: u64,
    /// Expiry to store with the mutated document
    pub expiry: u32,
    /// Negotiated connection features
    pub features: ClientFeatures,
}

impl SubdocCommand {
    /// Create a command with no value, flags or CAS
    pub fn new(key: impl Into<String>, opcode: Opcode, path: impl Into<String>) -> Self {
        SubdocCommand {
            key: key.into(),
            opcode,
            path: path.into(),
            value: Vec::new(),
            doc_flags: DocFlags::empty(),
            path_flags: PathFlags::empty(),
            cas: 0,
            expiry: 0,
            features: ClientFeatures::default(),
        }
    }

    /// Set the operation input
    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the document flags
    pub fn with_doc_flags(mut self, flags: DocFlags) -> Self {
        self.doc_flags = flags;
        self
    }

    /// Set the path flags
    pub fn with_path_flags(mut self, flags: PathFlags) -> Self {
        self.path_flags = flags;
        self
    }

    /// Set the expected CAS
    pub fn with_cas(mut self, cas: u64) -> Self {
        self.cas = cas;
        self
    }

    /// Set the expiry
    pub fn with_expiry(mut self, expiry: u32) -> Self {
        self.expiry = expiry;
        self
    }

    /// Set the negotiated features
    pub fn with_features(mut self, features: ClientFeatures) -> Self {
        self.features = features;
        self
    }

    /// Engine operation for this command
    pub fn operation(&self) -> Operation {
        self.opcode.operation()
    }

    /// True if the path addresses the extended attributes
    pub fn targets_xattr(&self) -> bool {
        self.path_flags.contains(PathFlags::XATTR)
    }
}
