//! Query request handling
//!
//! The service answers a fixed table of statements and validates prepared
//! plans against an index epoch. Resetting the epoch is how tests simulate
//! dropped indexes: plans prepared before the reset go stale.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::{debug, info};

use crate::error::QueryError;

/// Canned error answered instead of the normal result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInjection {
    /// Message reported to the client
    pub message: String,
    /// Query error code reported to the client
    pub code: i64,
    /// Only fail requests with this statement (case-insensitive); `None`
    /// fails every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
}

impl ErrorInjection {
    /// Fail every request
    pub fn new(message: impl Into<String>, code: i64) -> Self {
        ErrorInjection {
            message: message.into(),
            code,
            statement: None,
        }
    }

    /// Restrict the injection to one statement
    pub fn for_statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    fn matches(&self, request: &Map<String, Value>) -> bool {
        match &self.statement {
            None => true,
            Some(wanted) => request
                .get("statement")
                .and_then(Value::as_str)
                .map_or(false, |s| s.eq_ignore_ascii_case(wanted)),
        }
    }
}

/// HTTP-level answer to a query request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body (JSON, or error text for 400, empty for 405)
    pub body: String,
}

impl QueryResponse {
    /// Parse the body as JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

impl From<QueryError> for QueryResponse {
    fn from(err: QueryError) -> Self {
        let body = match (&err, err.code()) {
            (QueryError::MethodNotAllowed(_), _) => String::new(),
            (_, Some(code)) => json!({ "errors": [{ "msg": err.to_string(), "code": code }] })
                .to_string(),
            (_, None) => err.to_string(),
        };
        QueryResponse {
            status: err.http_status(),
            body,
        }
    }
}

/// What an encoded plan decodes to
#[derive(Debug, Serialize, Deserialize)]
struct EncodedPlan {
    #[serde(rename = "randomNumber")]
    random_number: i32,
}

/// Plan row returned for a `prepare` statement
#[derive(Debug, Serialize)]
struct PlanRow {
    #[serde(rename = "randomNumber")]
    random_number: i32,
    encoded_plan: String,
    name: String,
}

/// The query service mock
///
/// Thread safety: all methods take `&self` and may be called concurrently.
#[derive(Debug)]
pub struct QueryService {
    epoch: AtomicI32,
    injection: RwLock<Option<ErrorInjection>>,
}

impl QueryService {
    /// Create a service with a fresh index epoch and no error injection
    pub fn new() -> Self {
        QueryService {
            epoch: AtomicI32::new(rand::random()),
            injection: RwLock::new(None),
        }
    }

    /// Current index epoch
    pub fn index_epoch(&self) -> i32 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Simulate dropping all indexes: previously prepared plans go stale
    pub fn reset_index_state(&self) {
        let previous = self.epoch.load(Ordering::SeqCst);
        let mut next = rand::random::<i32>();
        while next == previous {
            next = rand::random();
        }
        self.epoch.store(next, Ordering::SeqCst);
        info!(target: "docmock::query", "Reset index state");
    }

    /// Answer matching requests with a canned error
    pub fn set_error_injection(&self, injection: ErrorInjection) {
        info!(target: "docmock::query", code = injection.code, "Installed error injection");
        *self.injection.write() = Some(injection);
    }

    /// Remove any installed error injection
    pub fn clear_error_injection(&self) {
        *self.injection.write() = None;
    }

    /// Handle one request
    pub fn handle(&self, method: &str, body: &str) -> QueryResponse {
        let response = match self.dispatch(method, body) {
            Ok(rows) => QueryResponse {
                status: 200,
                body: json!({ "status": "success", "results": rows }).to_string(),
            },
            Err(err) => QueryResponse::from(err),
        };
        debug!(target: "docmock::query", method, status = response.status, "Query request answered");
        response
    }

    fn dispatch(&self, method: &str, body: &str) -> Result<Vec<Value>, QueryError> {
        if method != "POST" {
            return Err(QueryError::MethodNotAllowed(method.to_string()));
        }
        let request = match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(request)) => request,
            Ok(other) => {
                return Err(QueryError::BadRequest(format!(
                    "Body is not an object: {}",
                    other
                )))
            }
            Err(e) => return Err(QueryError::BadRequest(e.to_string())),
        };

        if let Some(injection) = self.injection.read().as_ref() {
            if injection.matches(&request) {
                return Err(QueryError::Injected {
                    message: injection.message.clone(),
                    code: injection.code,
                });
            }
        }

        match request.get("statement") {
            Some(Value::String(statement)) => self.run_statement(statement),
            Some(_) => Err(QueryError::BadRequest(
                "statement must be a string".to_string(),
            )),
            None => self.run_prepared(&request),
        }
    }

    fn run_statement(&self, statement: &str) -> Result<Vec<Value>, QueryError> {
        let statement = statement.to_lowercase();
        if statement.starts_with("prepare") {
            if statement != "prepare select mockrow" {
                return Err(QueryError::KeyspaceNotFound);
            }
            return Ok(vec![self.prepare()?]);
        }
        match statement.as_str() {
            "select mockrow" => Ok(vec![mock_row()]),
            "select emptyrow" => Ok(Vec::new()),
            _ => Err(QueryError::KeyspaceNotFound),
        }
    }

    fn prepare(&self) -> Result<Value, QueryError> {
        let random_number = self.index_epoch();
        let plan = serde_json::to_string(&EncodedPlan { random_number })
            .map_err(|e| QueryError::BadRequest(e.to_string()))?;
        let row = PlanRow {
            random_number,
            encoded_plan: STANDARD.encode(plan),
            name: format!("mock-plan-{}", rand::random::<u64>()),
        };
        serde_json::to_value(row).map_err(|e| QueryError::BadRequest(e.to_string()))
    }

    fn run_prepared(&self, request: &Map<String, Value>) -> Result<Vec<Value>, QueryError> {
        let name = request.get("prepared").and_then(Value::as_str);
        let encoded = request.get("encoded_plan").and_then(Value::as_str);
        let (Some(_), Some(encoded)) = (name, encoded) else {
            return Err(QueryError::MissingField);
        };

        let plan: EncodedPlan = STANDARD
            .decode(encoded)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(QueryError::BadEncodedPlan)?;

        if plan.random_number != self.index_epoch() {
            return Err(QueryError::IndexNotFound);
        }
        Ok(vec![mock_row()])
    }
}

impl Default for QueryService {
    fn default() -> Self {
        Self::new()
    }
}

fn mock_row() -> Value {
    json!({ "row": "value" })
}
