//! Thin blocking HTTP client: verb helpers, JSON bodies, and token auth.
//!
//! # Overview
//! `Client` turns a (method, url, body, headers) tuple into exactly one
//! request and returns the raw response when the server answers 200. Any
//! other status becomes a `StatusError` carrying the code and body text.
//! The actual network I/O happens behind the `Transport` trait;
//! `UreqTransport` is the default.
//!
//! # Design
//! - Every call takes a `Context`. Its deadline tightens the client timeout,
//!   and cancelling its token abandons the request, even mid-flight.
//! - Headers are an ordered list; repeated keys are all sent. The JSON
//!   helpers replace any caller `Content-Type` with `application/json`.
//! - `Authorization` tokens are sent verbatim, with no scheme prefix added.
//! - The free functions in `global` delegate to a lazily-built default client
//!   with a 5 second timeout.

pub mod client;
pub mod context;
pub mod error;
pub mod global;
pub mod http;
pub mod transport;

pub use client::{Client, ClientConfig, DEFAULT_TIMEOUT};
pub use context::{Context, ContextError};
pub use error::{BoxError, BuildError, Error, ErrorKind, Result, StatusError};
pub use global::default_client;
pub use self::http::{
    Header, HttpRequest, HttpResponse, ResponseBody, CONTENT_TYPE_JSON, STATUS_OK,
};
pub use tokio_util::sync::CancellationToken;
pub use transport::{Transport, UreqTransport};
