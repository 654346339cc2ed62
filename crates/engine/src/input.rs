//! Parsing of operation input values

use docmock_core::{is_scalar, SubdocError, SubdocResult, MAX_DELTA_DIGITS};
use serde_json::Value;

/// Parse exactly one JSON value
pub(crate) fn single_value(raw: Option<&str>) -> SubdocResult<Value> {
    let text = non_empty(raw)?;
    serde_json::from_str(text).map_err(|_| SubdocError::CannotInsert {
        reason: "value is not valid JSON",
    })
}

/// Parse a comma separated list of JSON values (`1,"two",[3]`)
pub(crate) fn value_list(raw: Option<&str>) -> SubdocResult<Vec<Value>> {
    let text = non_empty(raw)?;
    serde_json::from_str::<Vec<Value>>(&format!("[{}]", text)).map_err(|_| {
        SubdocError::CannotInsert {
            reason: "value is not a valid JSON list",
        }
    })
}

/// Parse exactly one scalar JSON value
pub(crate) fn scalar_value(raw: Option<&str>) -> SubdocResult<Value> {
    let value = single_value(raw)?;
    if !is_scalar(&value) {
        return Err(SubdocError::CannotInsert {
            reason: "value must be a primitive",
        });
    }
    Ok(value)
}

/// Parse a counter delta
///
/// Accepts an optional sign followed by decimal digits. More than
/// [`MAX_DELTA_DIGITS`] significant digits, or a value outside `i64`, is
/// `DeltaTooBig`; zero is `ZeroDelta`.
pub(crate) fn delta(raw: Option<&str>) -> SubdocResult<i64> {
    let text = non_empty(raw)?;
    let digits = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SubdocError::CannotInsert {
            reason: "delta is not an integer",
        });
    }
    if digits.trim_start_matches('0').len() > MAX_DELTA_DIGITS {
        return Err(SubdocError::DeltaTooBig);
    }
    let delta: i64 = text.parse().map_err(|_| SubdocError::DeltaTooBig)?;
    if delta == 0 {
        return Err(SubdocError::ZeroDelta);
    }
    Ok(delta)
}

fn non_empty(raw: Option<&str>) -> SubdocResult<&str> {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(SubdocError::CannotInsert {
            reason: "value is empty",
        }),
    }
}
