//! Wire responses

use docmock_core::{Datatype, MutationToken};
use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Response to a [`SubdocCommand`](crate::SubdocCommand)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Outcome
    pub status: Status,
    /// CAS of the document after the command (0 on failure)
    pub cas: u64,
    /// Datatype of `value`
    pub datatype: Datatype,
    /// Value payload, for operations that return one
    pub value: Option<Vec<u8>>,
    /// Mutation token, for writes when the client asked for them
    pub mutation_token: Option<MutationToken>,
}

impl Response {
    /// Failure (or bare success) with no CAS and no payload
    pub fn status(status: Status) -> Self {
        Response {
            status,
            cas: 0,
            datatype: Datatype::RAW,
            value: None,
            mutation_token: None,
        }
    }

    /// Success carrying `cas`
    pub fn success(cas: u64) -> Self {
        Response {
            cas,
            ..Response::status(Status::Success)
        }
    }

    /// Attach a JSON value payload
    pub fn with_value(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.value = Some(value.into());
        self.datatype = Datatype::JSON;
        self
    }

    /// Attach a mutation token
    pub fn with_token(mut self, token: MutationToken) -> Self {
        self.mutation_token = Some(token);
        self
    }

    /// Value payload as UTF-8 text
    pub fn value_str(&self) -> Option<&str> {
        self.value
            .as_deref()
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    /// True for a successful response
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
