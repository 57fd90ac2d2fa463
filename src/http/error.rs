//! Error types for typed HTTP requests.
//!
//! A call to [`Executor::send_typed`](super::Executor::send_typed) can fail in
//! three distinct places, and each one has its own type:
//!
//! - [`EncodeError`] - the request could not be built (no I/O happened)
//! - [`TransportError`] - the network call or the server failed
//! - [`DecodeError`] - the server answered, but the body did not match the
//!   expected type
//!
//! [`RequestError`] wraps all three so callers can use `?` once and still
//! match on the cause.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Failure reported by the transport session for one request.
///
/// This is the `Err` side of a [`ResponseEnvelope`](super::ResponseEnvelope).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request did not complete.
    ///
    /// Covers connection refused, DNS failures, timeouts, TLS handshake
    /// errors and failures while reading the response body.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("Server error {status}: {body}")]
    Status {
        /// The HTTP status code returned by the server.
        status: StatusCode,
        /// The response body, lossily decoded as UTF-8.
        body: String,
    },
}

impl TransportError {
    /// The HTTP status, if the server produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Request(e) => e.status(),
            TransportError::Status { status, .. } => Some(*status),
        }
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, TransportError::Request(e) if e.is_connect())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Request(e) if e.is_timeout())
    }
}

/// The response body could not be decoded into the requested type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("Response is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),

    /// The body is JSON but does not fit the target type.
    ///
    /// The message names the offending field where serde can determine it,
    /// e.g. ``missing field `paramB` ``.
    #[error("Response does not match the expected type: {0}")]
    Shape(#[source] serde_json::Error),
}

/// The request could not be built from the given path, method and parameters.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Request path is empty")]
    EmptyPath,

    #[error("URL parse error: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The parameters cannot be flattened into `key=value` pairs.
    #[error("Query encoding failed: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    #[error("JSON body encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// No parameter encoding is defined for this method.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(Method),
}

/// Any failure of a typed request.
///
/// # Example
///
/// ```rust,no_run
/// use echofetch::http::RequestError;
///
/// fn report(err: &RequestError) {
///     match err {
///         RequestError::Transport(e) => eprintln!("network or server failed: {e}"),
///         RequestError::Decode(e) => eprintln!("unexpected response shape: {e}"),
///         RequestError::Encode(e) => eprintln!("bad request: {e}"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl RequestError {
    pub fn is_transport(&self) -> bool {
        matches!(self, RequestError::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, RequestError::Decode(_))
    }

    pub fn is_encode(&self) -> bool {
        matches!(self, RequestError::Encode(_))
    }
}
