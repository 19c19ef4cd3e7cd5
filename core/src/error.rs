//! Error types for the Yammer API client.
//!
//! # Design
//! A single flat enum covers every failure a call can produce. Variants fall
//! into three families, and the `is_*` predicates let callers match on the
//! family instead of the individual variant:
//!
//! - response errors, classified from the HTTP status of a completed call;
//! - input-validation errors, raised before any request is sent;
//! - local decoding errors (JSON, model access, transport).

use thiserror::Error;

/// Failure reported by a [`Transport`](crate::Transport) implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the client, the endpoint APIs and the authenticator.
#[derive(Debug, Error)]
pub enum Error {
    /// The server returned 404.
    #[error("not found: {reason}")]
    NotFound { reason: String },

    /// The server returned 401.
    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// The server returned 400 with an `OAuthException` body; the token has
    /// expired or been revoked.
    #[error("invalid access token: {reason}")]
    InvalidAccessToken { reason: String },

    /// The server returned 429.
    #[error("rate limit exceeded: {reason}")]
    RateLimitExceeded { reason: String },

    /// Any other non-2xx status.
    #[error("{status} error: {reason}")]
    Response { status: u16, reason: String },

    /// A successful response did not have the shape the caller needed.
    #[error("unexpected response format")]
    UnexpectedResponseFormat,

    /// A new message listed more topics than the API accepts.
    #[error("too many topics ({count}), the maximum is {max}")]
    TooManyTopics { count: usize, max: usize },

    /// A non-empty open graph object was missing its `url`.
    #[error("open graph object requires a url")]
    InvalidOpenGraphObject,

    /// An education record was missing a required field.
    #[error("education record missing {field}")]
    InvalidEducationRecord { field: String },

    /// A previous-company record was missing a required field.
    #[error("previous company record missing {field}")]
    InvalidPreviousCompanyRecord { field: String },

    /// A reference could not be rendered as a path segment.
    #[error("cannot use {0} as a resource identifier")]
    InvalidIdentifier(String),

    /// An argument was still nested, boolean or absent after conversion.
    #[error("argument `{key}` is not a flat parameter after conversion")]
    UnflattenedArgument { key: String },

    /// A response model did not contain the requested field.
    #[error("field `{0}` not present")]
    MissingField(String),

    /// A response model field had a different JSON type than requested.
    #[error("expected {expected}")]
    UnexpectedType { expected: &'static str },

    /// A response body could not be parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The transport could not complete the round trip.
    #[error("transport error: {0}")]
    Transport(#[source] TransportError),
}

impl Error {
    /// True for errors classified from an HTTP response.
    pub fn is_response_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::Unauthorized { .. }
                | Error::InvalidAccessToken { .. }
                | Error::RateLimitExceeded { .. }
                | Error::Response { .. }
                | Error::UnexpectedResponseFormat
        )
    }

    /// True for errors rejecting a new message before it was sent.
    pub fn is_invalid_message(&self) -> bool {
        matches!(self, Error::TooManyTopics { .. } | Error::InvalidOpenGraphObject)
    }

    /// True for errors rejecting user profile data before it was sent.
    pub fn is_invalid_user(&self) -> bool {
        matches!(
            self,
            Error::InvalidEducationRecord { .. } | Error::InvalidPreviousCompanyRecord { .. }
        )
    }

    /// HTTP status behind a response error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::Unauthorized { .. } => Some(401),
            Error::InvalidAccessToken { .. } => Some(400),
            Error::RateLimitExceeded { .. } => Some(429),
            Error::Response { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
