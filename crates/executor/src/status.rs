//! Wire status codes and the translation of internal failures to them

use docmock_core::{StoreError, SubdocError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response status as carried in the response header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Status {
    /// Operation succeeded
    Success = 0x00,
    /// Document does not exist
    KeyNotFound = 0x01,
    /// Document exists where it must not, or CAS mismatch
    KeyExists = 0x02,
    /// Resulting document exceeds the item size limit
    TooBig = 0x03,
    /// Request is not valid for its flags
    InvalidArguments = 0x04,
    /// Document is locked by another client
    Locked = 0x09,
    /// Try again later
    TemporaryFailure = 0x86,
    /// Path does not exist in the document
    SubdocPathNotFound = 0xc0,
    /// Path meets the wrong container type
    SubdocPathMismatch = 0xc1,
    /// Path syntax is invalid or unusable for the operation
    SubdocPathInvalid = 0xc2,
    /// Path is too long or has too many components
    SubdocPathTooBig = 0xc3,
    /// Document is nested too deeply
    SubdocDocTooDeep = 0xc4,
    /// Value cannot be inserted
    SubdocValueCannotInsert = 0xc5,
    /// Document is not JSON
    SubdocDocNotJson = 0xc6,
    /// Counter result out of range
    SubdocNumberRange = 0xc7,
    /// Counter delta invalid or existing value not a counter
    SubdocDeltaRange = 0xc8,
    /// Path already exists
    SubdocPathExists = 0xc9,
    /// Resulting value is nested too deeply
    SubdocValueTooDeep = 0xca,
}

impl Status {
    /// Protocol status code
    pub fn code(self) -> u16 {
        self as u16
    }

    /// True for `Success`
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Status for a store refusal
    ///
    /// Clients without extended errors cannot interpret `Locked` and get
    /// `TemporaryFailure` instead.
    pub fn from_store_error(err: &StoreError, xerror: bool) -> Self {
        match err {
            StoreError::KeyExists | StoreError::CasMismatch { .. } => Status::KeyExists,
            StoreError::KeyNotFound => Status::KeyNotFound,
            StoreError::Locked if xerror => Status::Locked,
            StoreError::Locked => Status::TemporaryFailure,
        }
    }

    /// Protocol name of the status
    pub fn name(self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::KeyNotFound => "KEY_ENOENT",
            Status::KeyExists => "KEY_EEXISTS",
            Status::TooBig => "E2BIG",
            Status::InvalidArguments => "EINVAL",
            Status::Locked => "LOCKED",
            Status::TemporaryFailure => "ETMPFAIL",
            Status::SubdocPathNotFound => "SUBDOC_PATH_ENOENT",
            Status::SubdocPathMismatch => "SUBDOC_PATH_MISMATCH",
            Status::SubdocPathInvalid => "SUBDOC_PATH_EINVAL",
            Status::SubdocPathTooBig => "SUBDOC_PATH_E2BIG",
            Status::SubdocDocTooDeep => "SUBDOC_DOC_E2DEEP",
            Status::SubdocValueCannotInsert => "SUBDOC_VALUE_CANTINSERT",
            Status::SubdocDocNotJson => "SUBDOC_DOC_NOTJSON",
            Status::SubdocNumberRange => "SUBDOC_NUM_ERANGE",
            Status::SubdocDeltaRange => "SUBDOC_DELTA_ERANGE",
            Status::SubdocPathExists => "SUBDOC_PATH_EEXISTS",
            Status::SubdocValueTooDeep => "SUBDOC_VALUE_ETOODEEP",
        }
    }
}

impl From<&SubdocError> for Status {
    fn from(err: &SubdocError) -> Self {
        match err {
            SubdocError::PathNotFound => Status::SubdocPathNotFound,
            SubdocError::PathExists => Status::SubdocPathExists,
            SubdocError::PathMismatch { .. } => Status::SubdocPathMismatch,
            SubdocError::PathInvalid { .. } | SubdocError::PathParse(_) => {
                Status::SubdocPathInvalid
            }
            SubdocError::PathTooBig => Status::SubdocPathTooBig,
            SubdocError::DocNotJson => Status::SubdocDocNotJson,
            SubdocError::DocTooDeep => Status::SubdocDocTooDeep,
            SubdocError::CannotInsert { .. } => Status::SubdocValueCannotInsert,
            SubdocError::ValueTooDeep => Status::SubdocValueTooDeep,
            SubdocError::NumberTooBig => Status::SubdocNumberRange,
            SubdocError::BadNumber | SubdocError::DeltaTooBig | SubdocError::ZeroDelta => {
                Status::SubdocDeltaRange
            }
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.name(), self.code())
    }
}
