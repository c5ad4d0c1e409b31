//! HTTP request and response types passed across the transport seam.
//!
//! # Design
//! `HttpRequest` is plain data: by the time a `Transport` sees it, the method,
//! URI, and headers have already been validated by `Client`. `HttpResponse`
//! keeps the body as a stream so callers decide how much of it to read.
//! Dropping a `ResponseBody` releases the underlying connection.

use std::fmt;
use std::io::{self, Cursor, Read};
use std::time::Duration;

use http::{Method, Uri};
use serde::de::DeserializeOwned;

/// Media type sent by the JSON helpers.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The only status code treated as success. 201 and 204 are failures.
pub const STATUS_OK: u16 = 200;

/// A single header entry. Repeated keys are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// `Authorization` header carrying `token` exactly as given.
    pub fn authorization(token: impl Into<String>) -> Self {
        Self::new("Authorization", token)
    }

    pub fn content_type_json() -> Self {
        Self::new("Content-Type", CONTENT_TYPE_JSON)
    }
}

impl<K: Into<String>, V: Into<String>> From<(K, V)> for Header {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}

/// A validated outbound request.
///
/// Built by `Client::request`. `timeout` bounds the whole round trip
/// (connect, send, receive) and is `None` only when neither the client nor
/// the call context sets a limit.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: Vec<Header>,
    pub body: Vec<u8>,
    pub timeout: Option<Duration>,
}

/// A response with a readable body stream.
///
/// Returned to the caller only when the status is 200; the caller owns the
/// body from then on.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<Header>,
    pub body: ResponseBody,
}

impl HttpResponse {
    /// First value of `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Every value of `name`, in the order received.
    pub fn headers_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |h| h.key.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn text(mut self) -> io::Result<String> {
        self.body.read_to_string()
    }

    pub fn json<T: DeserializeOwned>(self) -> serde_json::Result<T> {
        serde_json::from_reader(self.body)
    }
}

/// Owned response body stream.
pub struct ResponseBody {
    reader: Box<dyn Read + Send>,
}

impl ResponseBody {
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        Self {
            reader: Box::new(reader),
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Cursor::new(bytes.into()))
    }

    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    pub fn read_to_vec(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.reader.read_to_end(&mut buf)?;
        Ok(buf)
    }

    pub fn read_to_string(&mut self) -> io::Result<String> {
        let mut buf = String::new();
        self.reader.read_to_string(&mut buf)?;
        Ok(buf)
    }
}

impl Read for ResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseBody").finish_non_exhaustive()
    }
}
