//! Typed errors for the storage pipeline.
//!
//! Non-2xx responses are mapped exactly once, at the boundary between
//! dispatch and the caller: the service's own `message` field is
//! preferred, and only when the body has none does the generic
//! status-derived fallback apply.

use http::{Method, StatusCode};
use url::Url;

use crate::schema::ValidationError;

/// Failure category derived at the error-mapping boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    GenericHttp,
}

impl ErrorKind {
    /// Derive the kind from an HTTP status code alone.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => ErrorKind::NotFound,
            StatusCode::CONFLICT => ErrorKind::Conflict,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Unauthorized,
            _ => ErrorKind::GenericHttp,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::GenericHttp => "generic_http",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method and URL of the call that produced an error.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub url: Url,
}

impl std::fmt::Display for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// Strategy for interpreting a non-2xx response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorParser {
    /// Use the service-provided `message` field when present, falling
    /// back to the generic parser otherwise.
    #[default]
    StorageApi,
    /// Derive kind and message from status code and raw body alone.
    GenericHttp,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{kind} error calling {context}: {message}")]
    Http {
        kind: ErrorKind,
        status: StatusCode,
        message: String,
        context: RequestContext,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("could not decode response body: {0}")]
    Decode(String),
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid request header `{0}`")]
    InvalidHeader(String),
    #[error("byte stream already consumed")]
    StreamConsumed,
    #[error("transfer interrupted: {0}")]
    Interrupted(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl StorageError {
    /// Taxonomy kind, for the variants that carry one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            StorageError::Http { kind, .. } => Some(*kind),
            StorageError::Validation(_) => Some(ErrorKind::Validation),
            _ => None,
        }
    }

    /// HTTP status, for errors mapped from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            StorageError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Map a non-2xx response to a typed error.
///
/// Service-specific message extraction runs first; the generic
/// status-derived fallback applies only when the body yields no usable
/// `message` field. Never the reverse.
pub(crate) fn map_error_response(
    parser: ErrorParser,
    status: StatusCode,
    body: &[u8],
    context: RequestContext,
) -> StorageError {
    let message = match parser {
        ErrorParser::StorageApi => service_message(body),
        ErrorParser::GenericHttp => None,
    };
    let message = match message {
        Some(message) => message,
        None => {
            tracing::debug!(status = %status, "error body carried no service message, using generic parser");
            generic_message(status, body)
        }
    };
    StorageError::Http {
        kind: ErrorKind::from_status(status),
        status,
        message,
        context,
    }
}

fn service_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("message")?.as_str().map(str::to_owned)
}

fn generic_message(status: StatusCode, body: &[u8]) -> String {
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        reason.to_string()
    } else {
        format!("{}: {}", reason, text)
    }
}
