//! Subdocument operations and their properties

use std::fmt;

/// A subdocument operation
///
/// Each operation carries three independent properties:
///
/// | Operation | Lookup | Creative | Returns match |
/// |-----------|--------|----------|---------------|
/// | `Get` | yes | no | yes |
/// | `Exists` | yes | no | no |
/// | `DictAdd` | no | yes | no |
/// | `DictUpsert` | no | yes | no |
/// | `Replace` | no | no | no |
/// | `Delete` | no | no | no |
/// | `ArrayPushLast` | no | yes | yes |
/// | `ArrayPushFirst` | no | yes | yes |
/// | `ArrayInsert` | no | no | yes |
/// | `ArrayAddUnique` | no | yes | yes |
/// | `Counter` | no | yes | yes |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Read the value at a path
    Get,
    /// Check whether a path resolves
    Exists,
    /// Insert a new object member
    DictAdd,
    /// Insert or overwrite an object member
    DictUpsert,
    /// Overwrite an existing value
    Replace,
    /// Remove an existing value
    Delete,
    /// Append to an array
    ArrayPushLast,
    /// Prepend to an array
    ArrayPushFirst,
    /// Insert into an array at an index
    ArrayInsert,
    /// Append a scalar to an array unless an equal one is present
    ArrayAddUnique,
    /// Add a signed delta to an integer
    Counter,
}

impl Operation {
    /// Every operation, in protocol order
    pub const ALL: [Operation; 11] = [
        Operation::Get,
        Operation::Exists,
        Operation::DictAdd,
        Operation::DictUpsert,
        Operation::Delete,
        Operation::Replace,
        Operation::ArrayPushLast,
        Operation::ArrayPushFirst,
        Operation::ArrayInsert,
        Operation::ArrayAddUnique,
        Operation::Counter,
    ];

    /// True for operations that only read
    pub fn is_lookup(self) -> bool {
        matches!(self, Operation::Get | Operation::Exists)
    }

    /// True for operations that produce a new document
    pub fn is_mutator(self) -> bool {
        !self.is_lookup()
    }

    /// True for operations allowed to fabricate missing structure
    pub fn is_creative(self) -> bool {
        matches!(
            self,
            Operation::DictAdd
                | Operation::DictUpsert
                | Operation::ArrayPushLast
                | Operation::ArrayPushFirst
                | Operation::ArrayAddUnique
                | Operation::Counter
        )
    }

    /// True for operations whose response carries a value payload
    pub fn returns_match(self) -> bool {
        matches!(
            self,
            Operation::Get
                | Operation::Counter
                | Operation::ArrayPushLast
                | Operation::ArrayPushFirst
                | Operation::ArrayInsert
                | Operation::ArrayAddUnique
        )
    }

    /// True for operations that need an input value
    pub fn needs_value(self) -> bool {
        self.is_mutator() && self != Operation::Delete
    }

    /// Protocol-style name
    pub fn name(self) -> &'static str {
        match self {
            Operation::Get => "GET",
            Operation::Exists => "EXISTS",
            Operation::DictAdd => "DICT_ADD",
            Operation::DictUpsert => "DICT_UPSERT",
            Operation::Replace => "REPLACE",
            Operation::Delete => "DELETE",
            Operation::ArrayPushLast => "ARRAY_PUSH_LAST",
            Operation::ArrayPushFirst => "ARRAY_PUSH_FIRST",
            Operation::ArrayInsert => "ARRAY_INSERT",
            Operation::ArrayAddUnique => "ARRAY_ADD_UNIQUE",
            Operation::Counter => "COUNTER",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
