//! The subdocument executor
//!
//! A pure function over document text: parse the document, resolve the
//! path, apply one [`Operation`] and, for mutators, re-serialize the whole
//! tree. Nothing here touches storage.
//!
//! # Canonical form
//!
//! Mutated documents are written as compact serde_json text with object
//! members kept in their original order.

use docmock_core::{
    nesting_depth, JsonPath, PathSegment, SubdocError, SubdocResult, MAX_NESTING_DEPTH,
};
use serde_json::Value;
use tracing::debug;

use crate::input;
use crate::navigate::{child_mut, descend_mut, lookup, mismatch};
use crate::operation::Operation;

/// Outcome of a successful execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    matched: Option<String>,
    new_doc: Option<String>,
    found: bool,
}

impl ExecutionResult {
    fn lookup(matched: Option<String>, found: bool) -> Self {
        ExecutionResult {
            matched,
            new_doc: None,
            found,
        }
    }

    fn mutation(new_doc: String, matched: Option<String>) -> Self {
        ExecutionResult {
            matched,
            new_doc: Some(new_doc),
            found: true,
        }
    }

    /// Serialized value payload, if the operation produced one
    pub fn match_str(&self) -> Option<&str> {
        self.matched.as_deref()
    }

    /// Replacement document text (mutators only)
    pub fn new_doc_str(&self) -> Option<&str> {
        self.new_doc.as_deref()
    }

    /// Take the replacement document text
    pub fn into_new_doc(self) -> Option<String> {
        self.new_doc
    }

    /// Whether the path resolved. Only `Exists` can report `false`.
    pub fn exists(&self) -> bool {
        self.found
    }
}

/// Execute `op` at `path` against `doc`
///
/// `value` is the raw input for mutators (ignored by lookups and `Delete`).
/// `mkdir_p` lets creative operations fabricate missing containers.
///
/// # Errors
///
/// Every failure is a [`SubdocError`] naming exactly what went wrong; the
/// input document is never modified.
pub fn execute(
    doc: &str,
    path: &str,
    op: Operation,
    value: Option<&str>,
    mkdir_p: bool,
) -> SubdocResult<ExecutionResult> {
    let parsed: JsonPath = path.parse()?;
    execute_path(doc, &parsed, op, value, mkdir_p)
}

/// Execute `op` against an already parsed path
pub fn execute_path(
    doc: &str,
    path: &JsonPath,
    op: Operation,
    value: Option<&str>,
    mkdir_p: bool,
) -> SubdocResult<ExecutionResult> {
    let result = run(doc, path, op, value, mkdir_p && op.is_creative());
    match &result {
        Ok(_) => debug!(target: "docmock::subdoc", op = %op, path = %path, "Subdoc operation succeeded"),
        Err(e) => debug!(target: "docmock::subdoc", op = %op, path = %path, error = %e, "Subdoc operation failed"),
    }
    result
}

/// Container text to seed a document that does not exist yet
///
/// `{}` when the path starts with a key, `[]` when it starts with an index
/// or when an array operation targets the root. `None` when no root makes
/// sense for the request.
///
/// # Errors
///
/// Returns the path's parse error, if any.
pub fn root_type(path: &str, op: Operation) -> SubdocResult<Option<&'static str>> {
    let parsed: JsonPath = path.parse()?;
    Ok(match parsed.segments().first() {
        Some(PathSegment::Key(_)) => Some("{}"),
        Some(_) => Some("[]"),
        None if matches!(
            op,
            Operation::ArrayPushLast | Operation::ArrayPushFirst | Operation::ArrayAddUnique
        ) =>
        {
            Some("[]")
        }
        None => None,
    })
}

fn run(
    doc: &str,
    path: &JsonPath,
    op: Operation,
    value: Option<&str>,
    create: bool,
) -> SubdocResult<ExecutionResult> {
    check_path(path, op)?;

    if op == Operation::Replace && path.is_root() {
        // Whole-document replacement never reads the old text
        let replacement = input::single_value(value)?;
        return finish(&replacement, None);
    }

    let mut root = parse_document(doc)?;

    match op {
        Operation::Get => {
            let found = lookup(&root, path.segments())?.ok_or(SubdocError::PathNotFound)?;
            Ok(ExecutionResult::lookup(Some(found.to_string()), true))
        }
        Operation::Exists => {
            let found = lookup(&root, path.segments())?.is_some();
            Ok(ExecutionResult::lookup(None, found))
        }
        Operation::DictAdd | Operation::DictUpsert => {
            let new_value = input::single_value(value)?;
            let (tail, parents) = split(path)?;
            let key = match tail {
                PathSegment::Key(key) => key,
                _ => return Err(dict_needs_key()),
            };
            let parent = descend_mut(&mut root, parents, tail, create)?;
            let obj = match parent {
                Value::Object(obj) => obj,
                other => return Err(mismatch("object", other)),
            };
            if op == Operation::DictAdd && obj.contains_key(key.as_str()) {
                return Err(SubdocError::PathExists);
            }
            obj.insert(key.clone(), new_value);
            finish(&root, None)
        }
        Operation::Replace => {
            let new_value = input::single_value(value)?;
            let (tail, parents) = split(path)?;
            let parent = descend_mut(&mut root, parents, tail, false)?;
            *child_mut(parent, tail, None)? = new_value;
            finish(&root, None)
        }
        Operation::Delete => {
            let (tail, parents) = split(path)?;
            let parent = descend_mut(&mut root, parents, tail, false)?;
            remove_child(parent, tail)?;
            finish(&root, None)
        }
        Operation::ArrayPushLast | Operation::ArrayPushFirst => {
            let values = input::value_list(value)?;
            let matched = join_values(&values);
            let arr = target_array(&mut root, path, create)?;
            if op == Operation::ArrayPushLast {
                arr.extend(values);
            } else {
                arr.splice(0..0, values);
            }
            finish(&root, Some(matched))
        }
        Operation::ArrayInsert => {
            let values = input::value_list(value)?;
            let matched = join_values(&values);
            let (tail, parents) = split(path)?;
            let parent = descend_mut(&mut root, parents, tail, false)?;
            let arr = match parent {
                Value::Array(arr) => arr,
                other => return Err(mismatch("array", other)),
            };
            let at = match tail {
                PathSegment::Index(idx) if *idx <= arr.len() => *idx,
                PathSegment::Index(_) => return Err(SubdocError::PathNotFound),
                PathSegment::Last => arr.len(),
                PathSegment::Key(_) => return Err(insert_needs_index()),
            };
            arr.splice(at..at, values);
            finish(&root, Some(matched))
        }
        Operation::ArrayAddUnique => {
            let new_value = input::scalar_value(value)?;
            let arr = target_array(&mut root, path, create)?;
            if !arr.iter().all(docmock_core::is_scalar) {
                return Err(SubdocError::CannotInsert {
                    reason: "array contains non-primitive values",
                });
            }
            if arr.contains(&new_value) {
                return Err(SubdocError::PathExists);
            }
            let matched = new_value.to_string();
            arr.push(new_value);
            finish(&root, Some(matched))
        }
        Operation::Counter => {
            let delta = input::delta(value)?;
            let (tail, parents) = split(path)?;
            let parent = descend_mut(&mut root, parents, tail, create)?;
            let slot = child_mut(parent, tail, create.then(|| Value::from(0)))?;
            let current = slot.as_i64().ok_or(SubdocError::BadNumber)?;
            let updated = current
                .checked_add(delta)
                .ok_or(SubdocError::NumberTooBig)?;
            *slot = Value::from(updated);
            finish(&root, Some(updated.to_string()))
        }
    }
}

/// Reject paths the operation can never use, before reading the document
fn check_path(path: &JsonPath, op: Operation) -> SubdocResult<()> {
    let tail = match path.last_segment() {
        Some(tail) => tail,
        None => {
            return match op {
                Operation::DictAdd
                | Operation::DictUpsert
                | Operation::Delete
                | Operation::Counter
                | Operation::ArrayInsert => Err(SubdocError::PathInvalid {
                    reason: "operation cannot target the document root",
                }),
                _ => Ok(()),
            };
        }
    };
    match (op, tail) {
        (Operation::DictAdd | Operation::DictUpsert, PathSegment::Key(_)) => Ok(()),
        (Operation::DictAdd | Operation::DictUpsert, _) => Err(dict_needs_key()),
        (Operation::ArrayInsert, PathSegment::Key(_)) => Err(insert_needs_index()),
        _ => Ok(()),
    }
}

fn dict_needs_key() -> SubdocError {
    SubdocError::PathInvalid {
        reason: "dictionary operations need a key as the last component",
    }
}

fn insert_needs_index() -> SubdocError {
    SubdocError::PathInvalid {
        reason: "array insert needs an index as the last component",
    }
}

fn split(path: &JsonPath) -> SubdocResult<(&PathSegment, &[PathSegment])> {
    path.split_last().ok_or(SubdocError::PathInvalid {
        reason: "operation cannot target the document root",
    })
}

fn parse_document(doc: &str) -> SubdocResult<Value> {
    let root: Value = serde_json::from_str(doc).map_err(|_| SubdocError::DocNotJson)?;
    if nesting_depth(&root) > MAX_NESTING_DEPTH {
        return Err(SubdocError::DocTooDeep);
    }
    Ok(root)
}

/// Resolve the array an array operation appends to, creating it if allowed
fn target_array<'a>(
    root: &'a mut Value,
    path: &JsonPath,
    create: bool,
) -> SubdocResult<&'a mut Vec<Value>> {
    let target = match path.split_last() {
        None => root,
        Some((tail, parents)) => {
            let parent = descend_mut(root, parents, tail, create)?;
            child_mut(parent, tail, create.then(|| Value::Array(Vec::new())))?
        }
    };
    match target {
        Value::Array(arr) => Ok(arr),
        other => Err(mismatch("array", other)),
    }
}

fn remove_child(parent: &mut Value, tail: &PathSegment) -> SubdocResult<Value> {
    match (tail, parent) {
        (PathSegment::Key(key), Value::Object(obj)) => obj
            .shift_remove(key.as_str())
            .ok_or(SubdocError::PathNotFound),
        (PathSegment::Index(idx), Value::Array(arr)) if *idx < arr.len() => Ok(arr.remove(*idx)),
        (PathSegment::Index(_), Value::Array(_)) => Err(SubdocError::PathNotFound),
        (PathSegment::Last, Value::Array(arr)) => arr.pop().ok_or(SubdocError::PathNotFound),
        (PathSegment::Key(_), other) => Err(mismatch("object", other)),
        (_, other) => Err(mismatch("array", other)),
    }
}

fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn finish(root: &Value, matched: Option<String>) -> SubdocResult<ExecutionResult> {
    if nesting_depth(root) > MAX_NESTING_DEPTH {
        return Err(SubdocError::ValueTooDeep);
    }
    Ok(ExecutionResult::mutation(root.to_string(), matched))
}
