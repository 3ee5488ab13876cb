use serde_json::Value;

use crate::codec;
use crate::error::{ErrorObject, Result};
use crate::request::Call;
use crate::types::{RequestId, Version};

/// What a Return carries: a success value or a structured error, never both
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

/// A canonical response to a [`Call`].
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    version: Version,
    id: Option<RequestId>,
    outcome: Outcome,
}

impl Return {
    pub fn new(version: Version, id: Option<RequestId>, outcome: Outcome) -> Self {
        Self {
            version,
            id,
            outcome,
        }
    }

    pub fn success(version: Version, id: Option<RequestId>, result: Value) -> Self {
        Self::new(version, id, Outcome::Result(result))
    }

    pub fn failure(version: Version, id: Option<RequestId>, error: ErrorObject) -> Self {
        Self::new(version, id, Outcome::Error(error))
    }

    /// Success reply to `call`, in the call's revision and with its id.
    pub fn for_call(call: &Call, result: Value) -> Self {
        Self::success(call.version(), call.id().cloned(), result)
    }

    /// Error reply to `call`, in the call's revision and with its id.
    pub fn error_for_call(call: &Call, error: ErrorObject) -> Self {
        Self::failure(call.version(), call.id().cloned(), error)
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn id(&self) -> Option<&RequestId> {
        self.id.as_ref()
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn has_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorObject> {
        match &self.outcome {
            Outcome::Error(error) => Some(error),
            Outcome::Result(_) => None,
        }
    }

    /// Replaces the outcome with an error and hands it back so the caller
    /// can adjust the HTTP status.
    pub fn set_error(
        &mut self,
        message: impl Into<String>,
        code: i64,
        data: Option<Value>,
    ) -> &mut ErrorObject {
        self.outcome = Outcome::Error(ErrorObject::with_code(code, message, data));
        match &mut self.outcome {
            Outcome::Error(error) => error,
            Outcome::Result(_) => unreachable!("outcome was just set to an error"),
        }
    }

    pub fn into_parts(self) -> (Version, Option<RequestId>, Outcome) {
        (self.version, self.id, self.outcome)
    }

    /// Wire shape of this return in its own revision.
    pub fn deflate(&self) -> Result<Value> {
        codec::deflate_return(self)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.deflate()?)?)
    }
}

impl From<(Version, RequestId, Value)> for Return {
    fn from((version, id, result): (Version, RequestId, Value)) -> Self {
        Self::success(version, Some(id), result)
    }
}
