//! Document types shared by the store and the command layer
//!
//! - Document: One stored item (body, xattrs, flags, expiry, CAS)
//! - Datatype: Datatype bits reported to clients
//! - MutationToken / MutationInfo: What a successful write hands back

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Datatype bits as carried in the binary protocol header
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Datatype: u8 {
        /// Opaque bytes
        const RAW = 0x00;
        /// Body is JSON
        const JSON = 0x01;
        /// Body is snappy-compressed
        const SNAPPY = 0x02;
        /// Item carries extended attributes
        const XATTR = 0x04;
    }
}

/// A stored item
///
/// The body is opaque unless a subdocument operation targets it, in which
/// case it is read as JSON text. Extended attributes are always JSON text;
/// an absent xattr buffer reads as `{}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Document key
    pub key: String,
    /// Body bytes, `None` for a document that only carries xattrs
    pub body: Option<Vec<u8>>,
    /// Extended attribute bytes
    pub xattr: Option<Vec<u8>>,
    /// Client-opaque flags
    pub flags: u32,
    /// Expiry as sent by the client (0 = never)
    pub expiry: u32,
    /// Version token, assigned by the store
    pub cas: u64,
    /// Datatype bits
    pub datatype: Datatype,
}

impl Document {
    /// Create a document with a body and no xattrs
    pub fn new(key: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Document {
            key: key.into(),
            body: Some(body.into()),
            xattr: None,
            flags: 0,
            expiry: 0,
            cas: 0,
            datatype: Datatype::RAW,
        }
    }

    /// Create a document with neither body nor xattrs
    pub fn empty(key: impl Into<String>) -> Self {
        Document {
            key: key.into(),
            body: None,
            xattr: None,
            flags: 0,
            expiry: 0,
            cas: 0,
            datatype: Datatype::RAW,
        }
    }

    /// Set the xattr buffer (builder pattern)
    pub fn with_xattr(mut self, xattr: impl Into<Vec<u8>>) -> Self {
        self.xattr = Some(xattr.into());
        self
    }

    /// Set the client flags (builder pattern)
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Body length in bytes (0 when absent)
    pub fn body_len(&self) -> usize {
        self.body.as_ref().map_or(0, Vec::len)
    }

    /// Body as UTF-8 text, if present and valid
    pub fn body_str(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Xattr buffer as UTF-8 text, if present and valid
    pub fn xattr_str(&self) -> Option<&str> {
        self.xattr
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// Identifies a mutation within a vbucket's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationToken {
    /// Partition the key hashes to
    pub vbucket: u16,
    /// Identity of the partition's history
    pub vbucket_uuid: u64,
    /// Sequence number assigned to the mutation
    pub seqno: u64,
}

impl fmt::Display for MutationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vb{}:{:#x}:{}", self.vbucket, self.vbucket_uuid, self.seqno)
    }
}

/// Result of a successful store write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationInfo {
    /// CAS of the newly written document
    pub cas: u64,
    /// Position of the write in its vbucket
    pub token: MutationToken,
}
