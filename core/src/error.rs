//! Error taxonomy shared by all services.
//!
//! Every failure a request can hit is one [`ErrorKind`]. The message carried
//! alongside is for logs only; callers see nothing but the mapped status and
//! canonical body (see [`crate::dispatch`]).

use thiserror::Error;

/// Closed set of failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller-supplied data violates a contract.
    BadRequest,
    /// Missing or wrong bearer credentials.
    Unauthorized,
    /// Wrong method or path for a single-purpose endpoint.
    Forbidden,
    /// Unknown route.
    NotFound,
    /// Known service, wrong HTTP method.
    MethodNotAllowed,
    /// The side effect (subprocess, signing) failed.
    ActionFailed,
    /// Anything else.
    Unclassified,
}

impl ErrorKind {
    /// Stable name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BadRequest",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::ActionFailed => "ActionFailed",
            Self::Unclassified => "Unclassified",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure with a human-readable message.
///
/// # Examples
///
/// ```
/// use sidecar_core::{ErrorKind, ServiceError};
///
/// let err = ServiceError::bad_request("port out of range");
/// assert_eq!(err.kind(), ErrorKind::BadRequest);
/// assert_eq!(err.to_string(), "[BadRequest] port out of range");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{kind}] {message}")]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
}

impl ServiceError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 400: the request failed validation.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// 401: bearer credentials missing or wrong.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// 403: method or path not served here.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// 404: no such route.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// 405: route exists for another method.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MethodNotAllowed, message)
    }

    /// 500: the action performer failed.
    #[must_use]
    pub fn action_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ActionFailed, message)
    }

    /// 501: an unexpected failure.
    #[must_use]
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unclassified, message)
    }

    /// The failure class.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The log message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result alias used throughout the services.
pub type ServiceResult<T> = Result<T, ServiceError>;
