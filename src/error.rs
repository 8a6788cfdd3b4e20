//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use serde_json::Value;
use std::time::Duration;

include!(concat!(env!("OUT_DIR"), "/ua.rs"));

pub(crate) fn sdk_version() -> &'static str {
    SDK_VERSION
}

pub(crate) fn user_agent() -> &'static str {
    USER_AGENT
}

/// The error type returned by all operations in this library.
///
/// Errors produced from a server response carry the http `status` along with
/// the `code` and `message` fields from the JSON error body (empty strings if
/// the body did not supply them).
#[derive(Debug, Clone)]
pub struct DocumentDBError {
    pub code: DocumentDBErrorCode,
    pub message: String,
    /// HTTP status of the response this error was built from, if any.
    pub status: Option<u16>,
    /// The `code` field of the server's JSON error body.
    pub server_code: String,
    // backoff hint from a 429 response, only used by the retry loop
    pub(crate) retry_after: Option<Duration>,
}

impl std::error::Error for DocumentDBError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl std::fmt::Display for DocumentDBError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if let Some(status) = self.status {
            return write!(
                f,
                "code={:?} status={} server_code=\"{}\" message=\"{}\"",
                self.code, status, self.server_code, self.message
            );
        }
        write!(f, "code={:?} message=\"{}\"", self.code, self.message)
    }
}

impl DocumentDBError {
    pub fn new(code: DocumentDBErrorCode, msg: &str) -> DocumentDBError {
        DocumentDBError {
            code,
            message: msg.to_string(),
            status: None,
            server_code: String::new(),
            retry_after: None,
        }
    }

    /// Map an http status and JSON error body to a typed error.
    ///
    /// The `code` and `message` fields are both optional; a body that is not
    /// JSON is kept as the message text. 404, 409 and 413 map to
    /// [`NotFound`](DocumentDBErrorCode::NotFound),
    /// [`AlreadyExists`](DocumentDBErrorCode::AlreadyExists) and
    /// [`TooLarge`](DocumentDBErrorCode::TooLarge); every other status maps to
    /// [`ServerError`](DocumentDBErrorCode::ServerError).
    pub fn classify(status: u16, body: &[u8]) -> DocumentDBError {
        let code = match status {
            404 => DocumentDBErrorCode::NotFound,
            409 => DocumentDBErrorCode::AlreadyExists,
            413 => DocumentDBErrorCode::TooLarge,
            _ => DocumentDBErrorCode::ServerError,
        };
        let (server_code, message) = match serde_json::from_slice::<Value>(body) {
            Ok(v) => (string_field(&v, "code"), string_field(&v, "message")),
            Err(_) => (
                String::new(),
                String::from_utf8_lossy(body).trim().to_string(),
            ),
        };
        DocumentDBError {
            code,
            message,
            status: Some(status),
            server_code,
            retry_after: None,
        }
    }

    /// True if the server reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.code == DocumentDBErrorCode::NotFound
    }

    /// True if the server reported a conflict with an existing resource.
    pub fn is_already_exists(&self) -> bool {
        self.code == DocumentDBErrorCode::AlreadyExists
    }
}

fn string_field(v: &Value, name: &str) -> String {
    match v.get(name) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

macro_rules! ia_error {
    ($($t:tt)*) => {{
        let m = format!($($t)*);
        crate::error::DocumentDBError::new(
            crate::error::DocumentDBErrorCode::IllegalArgument,
            &format!("{} ({})", m, crate::error::sdk_version()),
        )
    }};
}

pub(crate) use ia_error;

macro_rules! ia_err {
    ($($t:tt)*) => {{
        Err(crate::error::ia_error!($($t)*))
    }};
}

pub(crate) use ia_err;

impl From<reqwest::Error> for DocumentDBError {
    fn from(e: reqwest::Error) -> Self {
        let mut code = DocumentDBErrorCode::TransportError;
        if e.is_timeout() {
            code = DocumentDBErrorCode::RequestTimeout;
        }
        DocumentDBError::new(
            code,
            &format!("reqwest error: {} ({})", e, crate::error::sdk_version()),
        )
    }
}

impl From<reqwest::header::InvalidHeaderValue> for DocumentDBError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ia_error!("invalid header value: {}", e)
    }
}

impl From<url::ParseError> for DocumentDBError {
    fn from(e: url::ParseError) -> Self {
        ia_error!("error parsing url: {}", e)
    }
}

impl From<serde_json::Error> for DocumentDBError {
    fn from(e: serde_json::Error) -> Self {
        DocumentDBError::new(
            DocumentDBErrorCode::BadResponse,
            &format!("invalid JSON: {} ({})", e, crate::error::sdk_version()),
        )
    }
}

/// The category of a [`DocumentDBError`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DocumentDBErrorCode {
    /// The server returned 404: the addressed resource does not exist.
    NotFound,

    /// The server returned 409: a resource with the same id already exists
    /// in the parent scope.
    AlreadyExists,

    /// The server returned 413: the request entity (typically a document)
    /// exceeds the service size limit.
    TooLarge,

    /// Any other non-success server status. This is also returned when the
    /// server keeps throttling a request past the configured attempt ceiling,
    /// in which case the error carries the body of the last 429 response.
    ServerError,

    /// The master key is not valid base64 or has the wrong length. Returned
    /// when configuring the [`HandleBuilder`](crate::HandleBuilder), never per
    /// request.
    InvalidKey,

    /// [`QueryIterator::next()`](crate::QueryIterator::next()) was called without a
    /// preceding successful [`has_more()`](crate::QueryIterator::has_more()).
    IteratorMisuse,

    /// The application provided an illegal argument for the operation.
    IllegalArgument,

    /// The request did not complete within its timeout.
    RequestTimeout,

    /// The http transport failed before a response was received.
    TransportError,

    /// A success response could not be decoded into the expected resource.
    BadResponse,

    // Internal: a 429 that the retry loop will absorb.
    #[doc(hidden)]
    RateLimited,
}
