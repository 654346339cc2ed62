//! JSON path types for subdocument operations
//!
//! This module defines how a subdocument path is addressed:
//! - JsonPath: Path into a JSON document (e.g., `user.name` or `items[0]`)
//! - PathSegment: Individual path component (Key, Index or the `[-1]` marker)
//! - PathParseError: Why a raw path string was rejected
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `key` | Object member | `user` |
//! | `[n]` | Array index | `[0]` |
//! | `[-1]` | Last element / append position | `items[-1]` |
//! | `a.b` | Nested member | `user.name` |
//! | `` `a.b` `` | Literal member containing separators | `` `dotted.key` `` |
//! | (empty) | Root | `` |
//!
//! Inside a backtick-quoted section a doubled backtick stands for one
//! literal backtick.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::limits::{MAX_PATH_BYTES, MAX_PATH_COMPONENTS};

// =============================================================================
// JsonPath and PathSegment
// =============================================================================

/// Error type for JSON path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// Empty key in path
    #[error("empty key in path at position {0}")]
    EmptyKey(usize),
    /// Unclosed bracket
    #[error("unclosed bracket starting at position {0}")]
    UnclosedBracket(usize),
    /// Invalid array index
    #[error("invalid array index at position {0}: {1}")]
    InvalidIndex(usize, String),
    /// Unexpected character
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    /// Backtick quote never closed
    #[error("unterminated backtick quote starting at position {0}")]
    UnterminatedQuote(usize),
    /// `[-1]` used somewhere other than the final component
    #[error("[-1] is only allowed as the last path component (position {0})")]
    MisplacedLast(usize),
    /// Path text exceeds [`MAX_PATH_BYTES`]
    #[error("path length {length} exceeds maximum of {max} bytes")]
    TooLong {
        /// Actual length in bytes
        length: usize,
        /// Maximum allowed length
        max: usize,
    },
    /// Path has more than [`MAX_PATH_COMPONENTS`] components
    #[error("path has {count} components, maximum is {max}")]
    TooManyComponents {
        /// Actual component count
        count: usize,
        /// Maximum allowed count
        max: usize,
    },
}

/// A segment in a JSON path
///
/// # Examples
///
/// ```
/// use docmock_core::json::PathSegment;
///
/// let key = PathSegment::Key("name".to_string());
/// let idx = PathSegment::Index(0);
/// let last = PathSegment::Last;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathSegment {
    /// Object key: `.foo`
    Key(String),
    /// Array index: `[0]`
    Index(usize),
    /// Last element of an array, or the append position: `[-1]`
    Last,
}

impl PathSegment {
    /// True for the segments that address an array (`[n]` and `[-1]`)
    pub fn is_array_step(&self) -> bool {
        !matches!(self, PathSegment::Key(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write_key(f, k),
            PathSegment::Index(i) => write!(f, "[{}]", i),
            PathSegment::Last => f.write_str("[-1]"),
        }
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    if key.contains(&['.', '[', ']', '`'][..]) {
        write!(f, "`{}`", key.replace('`', "``"))
    } else {
        f.write_str(key)
    }
}

/// A path into a JSON document
///
/// # Examples
///
/// ```
/// use docmock_core::json::JsonPath;
///
/// let first_item = JsonPath::root().key("items").index(0);
///
/// let path: JsonPath = "items[0]".parse().unwrap();
/// assert_eq!(path, first_item);
/// assert_eq!(path.to_string(), "items[0]");
///
/// // The root path is the empty string
/// let root: JsonPath = "".parse().unwrap();
/// assert!(root.is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Create the root path (empty path)
    pub fn root() -> Self {
        JsonPath {
            segments: Vec::new(),
        }
    }

    /// Create a path from a vector of segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        JsonPath { segments }
    }

    /// Get the path segments
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Get the number of segments in the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a key segment (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    /// Append an index segment (builder pattern)
    pub fn index(mut self, idx: usize) -> Self {
        self.segments.push(PathSegment::Index(idx));
        self
    }

    /// Append the `[-1]` marker (builder pattern)
    pub fn last(mut self) -> Self {
        self.segments.push(PathSegment::Last);
        self
    }

    /// Get the parent path (None if root)
    pub fn parent(&self) -> Option<JsonPath> {
        self.split_last().map(|(_, parent)| JsonPath {
            segments: parent.to_vec(),
        })
    }

    /// Get the last segment (None if root)
    pub fn last_segment(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Split into the final segment and the segments leading to it
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.segments.split_last()
    }

    /// Convert to a string representation that parses back to this path
    pub fn to_path_string(&self) -> String {
        self.to_string()
    }
}

impl FromStr for JsonPath {
    type Err = PathParseError;

    /// Parse a path from a string
    ///
    /// Supported syntax:
    /// - `foo` - object key
    /// - `[0]` - array index, `[-1]` - last element
    /// - `foo.bar` - nested keys
    /// - `foo[0].bar` - mixed
    /// - `` `a.b` `` - quoted key taken literally
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > MAX_PATH_BYTES {
            return Err(PathParseError::TooLong {
                length: s.len(),
                max: MAX_PATH_BYTES,
            });
        }
        if s.is_empty() {
            return Ok(JsonPath::root());
        }

        let chars: Vec<char> = s.chars().collect();
        let mut segments = Vec::new();
        let mut i = 0;

        // A key is expected at the start of the path and after every '.'
        let mut expect_key = chars[0] != '[';

        while i < chars.len() {
            if expect_key {
                let start = i;
                let key = parse_key(&chars, &mut i)?;
                if key.is_empty() {
                    return Err(PathParseError::EmptyKey(start));
                }
                segments.push(PathSegment::Key(key));
            } else {
                // chars[i] is '[' here
                let start = i;
                i += 1;
                let idx_start = i;
                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }
                if i >= chars.len() {
                    return Err(PathParseError::UnclosedBracket(start));
                }
                let idx_str: String = chars[idx_start..i].iter().collect();
                i += 1; // Skip closing bracket
                segments.push(parse_index(idx_start, idx_str)?);
                if segments.last() == Some(&PathSegment::Last) && i < chars.len() {
                    return Err(PathParseError::MisplacedLast(start));
                }
            }

            // What may follow a completed component
            match chars.get(i) {
                None => break,
                Some('.') => {
                    i += 1;
                    if i >= chars.len() || chars[i] == '.' || chars[i] == '[' {
                        return Err(PathParseError::EmptyKey(i));
                    }
                    expect_key = true;
                }
                Some('[') => expect_key = false,
                Some(&c) => return Err(PathParseError::UnexpectedChar(c, i)),
            }
        }

        if segments.len() > MAX_PATH_COMPONENTS {
            return Err(PathParseError::TooManyComponents {
                count: segments.len(),
                max: MAX_PATH_COMPONENTS,
            });
        }

        Ok(JsonPath { segments })
    }
}

/// Read one object key starting at `*i`, stopping before `.` or `[`.
fn parse_key(chars: &[char], i: &mut usize) -> Result<String, PathParseError> {
    let mut key = String::new();
    while *i < chars.len() {
        match chars[*i] {
            '.' | '[' => break,
            ']' => return Err(PathParseError::UnexpectedChar(']', *i)),
            '`' => {
                let quote_start = *i;
                *i += 1;
                loop {
                    match chars.get(*i) {
                        None => return Err(PathParseError::UnterminatedQuote(quote_start)),
                        Some('`') if chars.get(*i + 1) == Some(&'`') => {
                            key.push('`');
                            *i += 2;
                        }
                        Some('`') => {
                            *i += 1;
                            break;
                        }
                        Some(&c) => {
                            key.push(c);
                            *i += 1;
                        }
                    }
                }
            }
            c => {
                key.push(c);
                *i += 1;
            }
        }
    }
    Ok(key)
}

fn parse_index(pos: usize, idx_str: String) -> Result<PathSegment, PathParseError> {
    if idx_str == "-1" {
        return Ok(PathSegment::Last);
    }
    if idx_str.is_empty() || !idx_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathParseError::InvalidIndex(pos, idx_str));
    }
    idx_str
        .parse::<usize>()
        .map(PathSegment::Index)
        .map_err(|_| PathParseError::InvalidIndex(pos, idx_str))
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            if i > 0 && matches!(seg, PathSegment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

// =============================================================================
// Value helpers
// =============================================================================

/// Calculate the maximum nesting depth of a JSON value
///
/// Returns 0 for primitives (null, bool, number, string),
/// and counts nested objects/arrays.
pub fn nesting_depth(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Number(_)
        | serde_json::Value::String(_) => 0,
        serde_json::Value::Array(arr) => 1 + arr.iter().map(nesting_depth).max().unwrap_or(0),
        serde_json::Value::Object(obj) => 1 + obj.values().map(nesting_depth).max().unwrap_or(0),
    }
}

/// Type name used in mismatch errors
pub fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// True for null, booleans, numbers and strings
pub fn is_scalar(value: &serde_json::Value) -> bool {
    !(value.is_array() || value.is_object())
}
