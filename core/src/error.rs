//! Error types for the HTTP client.
//!
//! # Design
//! Each `Error` variant names the phase that failed (build, send, status
//! check, marshal) and keeps the underlying cause as its `source`.
//! `StatusError` is the one callers usually branch on: the request reached
//! the server and came back with something other than 200.

use std::backtrace::Backtrace;
use std::fmt;

use thiserror::Error;

use crate::context::ContextError;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause returned by a `Transport`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by `Client` calls and the free functions.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be constructed. Nothing was sent.
    #[error("build request error: {0}")]
    Build(#[source] BuildError),

    /// The transport failed, timed out, or the call context was done.
    #[error("send request error: {0}")]
    Send(#[source] BoxError),

    /// The server answered with a status other than 200.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The JSON request body could not be serialized. Nothing was sent.
    #[error("json marshal error: {0}")]
    Marshal(#[source] serde_json::Error),
}

/// Coarse classification of `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Build,
    Transport,
    Status,
    Marshal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Build(_) => ErrorKind::Build,
            Error::Send(_) => ErrorKind::Transport,
            Error::Status(_) => ErrorKind::Status,
            Error::Marshal(_) => ErrorKind::Marshal,
        }
    }

    pub fn as_status(&self) -> Option<&StatusError> {
        match self {
            Error::Status(e) => Some(e),
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.as_status().map(StatusError::status_code)
    }

    /// True when the call ran out of time, either on the call context's
    /// deadline or on the transport's own timeout.
    pub fn is_timeout(&self) -> bool {
        let Error::Send(source) = self else {
            return false;
        };
        if let Some(ctx) = source.downcast_ref::<ContextError>() {
            return *ctx == ContextError::DeadlineExceeded;
        }
        match source.downcast_ref::<ureq::Error>() {
            Some(ureq::Error::Timeout(_)) => true,
            Some(ureq::Error::Io(io)) => io.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        }
    }

    pub(crate) fn context(err: ContextError) -> Self {
        Error::Send(Box::new(err))
    }
}

/// Why a request could not be constructed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid method: {0}")]
    Method(#[from] http::method::InvalidMethod),

    #[error("invalid url: {0}")]
    Url(#[from] http::uri::InvalidUri),

    #[error("url is not absolute: {0}")]
    RelativeUrl(String),

    #[error("invalid header name: {0}")]
    HeaderName(#[from] http::header::InvalidHeaderName),

    #[error("invalid value for header {name}")]
    HeaderValue {
        name: String,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Self {
        Error::Build(err)
    }
}

/// A completed request that the server rejected with a non-200 status.
#[derive(Debug)]
pub struct StatusError {
    status_code: u16,
    msg: String,
    backtrace: Backtrace,
}

impl StatusError {
    /// Captures a backtrace when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE`
    /// enables it.
    pub fn new(status_code: u16, msg: impl Into<String>) -> Self {
        Self {
            status_code,
            msg: msg.into(),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The response body text.
    pub fn message(&self) -> &str {
        &self.msg
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "status code {}: {}", self.status_code, self.msg)
    }
}

impl std::error::Error for StatusError {}
