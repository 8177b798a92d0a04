//! Response dispatcher.
//!
//! A pure mapping from an outcome to a `(status, body)` pair. No state, no
//! retries: one outcome in, one reply out.
//!
//! | Outcome          | Status | Plain body            | JSON body message       |
//! |------------------|--------|-----------------------|-------------------------|
//! | success          | 200    | endpoint specific     | endpoint specific       |
//! | BadRequest       | 400    | `BadRequest`          | `Bad Request`           |
//! | Unauthorized     | 401    | `Unauthorized`        | `Unauthorized`          |
//! | Forbidden        | 403    | `Forbidden`           | `Forbidden`             |
//! | NotFound         | 404    | `NotFound`            | `Not Found`             |
//! | MethodNotAllowed | 405    | `MethodNotAllowed`    | `Method Not Allowed`    |
//! | ActionFailed     | 500    | `InternalServerError` | `Internal Server Error` |
//! | Unclassified     | 501    | `NotImplemented`      | `Not Implemented`       |

use crate::error::{ErrorKind, ServiceError};
use serde_json::json;

/// How error bodies are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyStyle {
    /// Bare canonical word, e.g. `BadRequest`.
    #[default]
    Plain,
    /// `{"error":{"message":"Bad Request"}}`.
    Json,
}

/// Media type of a reply body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// `text/plain; charset=utf-8`
    Text,
    /// `application/json`
    Json,
}

impl ContentType {
    /// Header value for this media type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Json => "application/json",
        }
    }
}

/// A terminal response: written once, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
    /// Body media type.
    pub content_type: ContentType,
}

impl Reply {
    /// 200 with a text body.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: ContentType::Text,
        }
    }

    /// Map an error kind to its canonical reply.
    #[must_use]
    pub fn from_kind(kind: ErrorKind, style: BodyStyle) -> Self {
        let status = status_for(kind);
        match style {
            BodyStyle::Plain => Self {
                status,
                body: plain_body(kind).to_string(),
                content_type: ContentType::Text,
            },
            BodyStyle::Json => Self {
                status,
                body: json!({ "error": { "message": json_message(kind) } }).to_string(),
                content_type: ContentType::Json,
            },
        }
    }

    /// Map an error to its canonical reply. The message is not exposed.
    #[must_use]
    pub fn from_error(error: &ServiceError, style: BodyStyle) -> Self {
        Self::from_kind(error.kind(), style)
    }
}

/// Status code for an error kind.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::BadRequest => 400,
        ErrorKind::Unauthorized => 401,
        ErrorKind::Forbidden => 403,
        ErrorKind::NotFound => 404,
        ErrorKind::MethodNotAllowed => 405,
        ErrorKind::ActionFailed => 500,
        ErrorKind::Unclassified => 501,
    }
}

const fn plain_body(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::BadRequest => "BadRequest",
        ErrorKind::Unauthorized => "Unauthorized",
        ErrorKind::Forbidden => "Forbidden",
        ErrorKind::NotFound => "NotFound",
        ErrorKind::MethodNotAllowed => "MethodNotAllowed",
        ErrorKind::ActionFailed => "InternalServerError",
        ErrorKind::Unclassified => "NotImplemented",
    }
}

const fn json_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::BadRequest => "Bad Request",
        ErrorKind::Unauthorized => "Unauthorized",
        ErrorKind::Forbidden => "Forbidden",
        ErrorKind::NotFound => "Not Found",
        ErrorKind::MethodNotAllowed => "Method Not Allowed",
        ErrorKind::ActionFailed => "Internal Server Error",
        ErrorKind::Unclassified => "Not Implemented",
    }
}
