//! Path navigation over a parsed document
//!
//! Read-only lookups report absence as `Ok(None)`; mutable descent reports
//! it as `PathNotFound` unless asked to create the missing member. Only
//! object members are ever fabricated, never array elements.

use docmock_core::{value_type_name, PathSegment, SubdocError, SubdocResult};
use serde_json::Value;

pub(crate) fn mismatch(expected: &'static str, found: &Value) -> SubdocError {
    SubdocError::PathMismatch {
        expected,
        found: value_type_name(found),
    }
}

/// Empty container to create ahead of `next`
pub(crate) fn container_for(next: &PathSegment) -> Value {
    if next.is_array_step() {
        Value::Array(Vec::new())
    } else {
        Value::Object(serde_json::Map::new())
    }
}

/// Look up the value at `steps` below `root`
///
/// Returns `Ok(None)` when a member or element is missing, and
/// `PathMismatch` when a step meets the wrong container type.
pub(crate) fn lookup<'a>(root: &'a Value, steps: &[PathSegment]) -> SubdocResult<Option<&'a Value>> {
    let mut current = root;
    for step in steps {
        let next = match (step, current) {
            (PathSegment::Key(key), Value::Object(obj)) => obj.get(key.as_str()),
            (PathSegment::Index(idx), Value::Array(arr)) => arr.get(*idx),
            (PathSegment::Last, Value::Array(arr)) => arr.last(),
            (PathSegment::Key(_), other) => return Err(mismatch("object", other)),
            (_, other) => return Err(mismatch("array", other)),
        };
        match next {
            Some(v) => current = v,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

/// Step from `node` into its child at `step`
///
/// A missing object member is inserted as `create` when given; otherwise
/// it is `PathNotFound`. Missing array elements are always `PathNotFound`.
pub(crate) fn child_mut<'a>(
    node: &'a mut Value,
    step: &PathSegment,
    create: Option<Value>,
) -> SubdocResult<&'a mut Value> {
    match (step, node) {
        (PathSegment::Key(key), Value::Object(obj)) => {
            if !obj.contains_key(key.as_str()) {
                let seed = create.ok_or(SubdocError::PathNotFound)?;
                obj.insert(key.clone(), seed);
            }
            obj.get_mut(key.as_str()).ok_or(SubdocError::PathNotFound)
        }
        (PathSegment::Index(idx), Value::Array(arr)) => {
            arr.get_mut(*idx).ok_or(SubdocError::PathNotFound)
        }
        (PathSegment::Last, Value::Array(arr)) => arr.last_mut().ok_or(SubdocError::PathNotFound),
        (PathSegment::Key(_), other) => Err(mismatch("object", other)),
        (_, other) => Err(mismatch("array", other)),
    }
}

/// Walk `parents` from `root` and return the container that should hold
/// `tail`
///
/// With `mkdir_p`, missing members are created as empty containers whose
/// kind follows the step that comes after them.
pub(crate) fn descend_mut<'a>(
    root: &'a mut Value,
    parents: &[PathSegment],
    tail: &PathSegment,
    mkdir_p: bool,
) -> SubdocResult<&'a mut Value> {
    let mut current = root;
    for (i, step) in parents.iter().enumerate() {
        let next = parents.get(i + 1).unwrap_or(tail);
        current = child_mut(current, step, mkdir_p.then(|| container_for(next)))?;
    }
    Ok(current)
}
