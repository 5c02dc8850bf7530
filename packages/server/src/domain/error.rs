//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// EntityName validation error
    #[error("EntityName cannot be empty")]
    EntityNameEmpty,

    /// EntityName too long error
    #[error("EntityName cannot exceed {max} characters (got {actual})")]
    EntityNameTooLong { max: usize, actual: usize },

    /// ObjectId validation error
    #[error("ObjectId cannot be empty")]
    ObjectIdEmpty,

    /// Endpoint is not an http(s) URL with a host
    #[error("Endpoint must be an http(s) URL (got: {0})")]
    EndpointInvalid(String),
}

/// A remote call did not complete.
///
/// This is the only failure a call on an entity or registry can report, and
/// it always means "presume the peer dead". A call that completed but was
/// refused by policy returns `Ok(false)` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("peer unreachable: {reason}")]
pub struct Unreachable {
    reason: String,
}

impl Unreachable {
    /// Create a new Unreachable with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why the call did not complete.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Outcome of a call on a possibly remote party.
pub type Remote<T> = Result<T, Unreachable>;
