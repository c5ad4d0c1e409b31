//! Verb, JSON and auth helpers over a pluggable `Transport`.
//!
//! # Design
//! `Client` holds only its timeout and a shared transport, so it is
//! immutable after construction and safe to share between threads. Every
//! helper funnels into `request`, which is the single place where a request
//! is validated, sent, and status-checked. Only status 200 counts as success;
//! any other status turns into a `StatusError` after the body has been read
//! and the response dropped.

use std::sync::Arc;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{Method, Uri};
use serde::Serialize;
use tracing::debug;

use crate::context::Context;
use crate::error::{BuildError, Error, Result, StatusError};
use crate::http::{Header, HttpRequest, HttpResponse, STATUS_OK};
use crate::transport::{Transport, UreqTransport};

/// Request timeout used by `ClientConfig::default` and the default client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for a `Client`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound on the whole request/response cycle. Zero disables it.
    pub timeout: Duration,
    /// Transport to send requests with; `None` selects `UreqTransport`.
    pub transport: Option<Arc<dyn Transport>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            transport: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    timeout: Duration,
    transport: Arc<dyn Transport>,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_config(ClientConfig::default())
    }
}

impl Client {
    /// Create a client. A `None` transport falls back to `UreqTransport`.
    pub fn new(timeout: Duration, transport: Option<Arc<dyn Transport>>) -> Self {
        Self::with_config(ClientConfig { timeout, transport })
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = config
            .transport
            .unwrap_or_else(|| Arc::new(UreqTransport::new()));
        Self {
            timeout: config.timeout,
            transport,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send one request and return the response if the status is 200.
    ///
    /// Headers are sent in the given order; repeated keys are all sent.
    /// On any other status the body is read (best effort), the response is
    /// closed, and a `StatusError` carrying the code and body is returned.
    pub fn request(
        &self,
        ctx: &Context,
        method: &str,
        url: &str,
        body: impl Into<Vec<u8>>,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        let request = self.build(ctx, method, url, body.into(), headers)?;

        if let Some(err) = ctx.err() {
            return Err(Error::context(err));
        }

        let method = request.method.clone();
        debug!(%method, url, timeout = ?request.timeout, "sending request");
        let mut response = self
            .transport
            .round_trip(request, ctx.cancellation())
            .map_err(|e| {
                debug!(%method, url, error = %e, "request failed");
                Error::Send(e)
            })?;

        // A response that lands after cancellation is dropped unread.
        if let Some(err) = ctx.err() {
            return Err(Error::context(err));
        }

        if response.status != STATUS_OK {
            let status = response.status;
            let msg = response
                .body
                .read_to_vec()
                .map(|b| String::from_utf8_lossy(&b).into_owned())
                .unwrap_or_default();
            drop(response);
            debug!(%method, url, status, "unexpected status");
            return Err(StatusError::new(status, msg).into());
        }

        Ok(response)
    }

    /// Send `data` as JSON. `None` sends an empty body.
    ///
    /// `Content-Type: application/json` replaces any `Content-Type` in
    /// `headers` and is sent after the remaining ones.
    pub fn request_json<T>(
        &self,
        ctx: &Context,
        method: &str,
        url: &str,
        data: Option<&T>,
        headers: &[Header],
    ) -> Result<HttpResponse>
    where
        T: Serialize + ?Sized,
    {
        let body = match data {
            Some(data) => serde_json::to_vec(data).map_err(Error::Marshal)?,
            None => Vec::new(),
        };
        let headers: Vec<Header> = headers
            .iter()
            .filter(|h| !h.key.eq_ignore_ascii_case(CONTENT_TYPE.as_str()))
            .cloned()
            .chain(std::iter::once(Header::content_type_json()))
            .collect();
        self.request(ctx, method, url, body, &headers)
    }

    pub fn get(&self, ctx: &Context, url: &str, headers: &[Header]) -> Result<HttpResponse> {
        self.request(ctx, "GET", url, Vec::new(), headers)
    }

    pub fn post(
        &self,
        ctx: &Context,
        url: &str,
        body: impl Into<Vec<u8>>,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.request(ctx, "POST", url, body, headers)
    }

    pub fn put(
        &self,
        ctx: &Context,
        url: &str,
        body: impl Into<Vec<u8>>,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.request(ctx, "PUT", url, body, headers)
    }

    pub fn delete(&self, ctx: &Context, url: &str, headers: &[Header]) -> Result<HttpResponse> {
        self.request(ctx, "DELETE", url, Vec::new(), headers)
    }

    pub fn get_with_auth(
        &self,
        ctx: &Context,
        url: &str,
        token: &str,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.get(ctx, url, &with_header(headers, Header::authorization(token)))
    }

    pub fn post_with_auth(
        &self,
        ctx: &Context,
        url: &str,
        token: &str,
        body: impl Into<Vec<u8>>,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.post(ctx, url, body, &with_header(headers, Header::authorization(token)))
    }

    pub fn put_with_auth(
        &self,
        ctx: &Context,
        url: &str,
        token: &str,
        body: impl Into<Vec<u8>>,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.put(ctx, url, body, &with_header(headers, Header::authorization(token)))
    }

    pub fn delete_with_auth(
        &self,
        ctx: &Context,
        url: &str,
        token: &str,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.delete(ctx, url, &with_header(headers, Header::authorization(token)))
    }

    pub fn get_json(&self, ctx: &Context, url: &str, headers: &[Header]) -> Result<HttpResponse> {
        self.request_json::<()>(ctx, "GET", url, None, headers)
    }

    pub fn post_json<T>(
        &self,
        ctx: &Context,
        url: &str,
        data: &T,
        headers: &[Header],
    ) -> Result<HttpResponse>
    where
        T: Serialize + ?Sized,
    {
        self.request_json(ctx, "POST", url, Some(data), headers)
    }

    pub fn put_json<T>(
        &self,
        ctx: &Context,
        url: &str,
        data: &T,
        headers: &[Header],
    ) -> Result<HttpResponse>
    where
        T: Serialize + ?Sized,
    {
        self.request_json(ctx, "PUT", url, Some(data), headers)
    }

    pub fn delete_json(
        &self,
        ctx: &Context,
        url: &str,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.request_json::<()>(ctx, "DELETE", url, None, headers)
    }

    pub fn get_json_with_auth(
        &self,
        ctx: &Context,
        url: &str,
        token: &str,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.get_json(ctx, url, &with_header(headers, Header::authorization(token)))
    }

    pub fn post_json_with_auth<T>(
        &self,
        ctx: &Context,
        url: &str,
        token: &str,
        data: &T,
        headers: &[Header],
    ) -> Result<HttpResponse>
    where
        T: Serialize + ?Sized,
    {
        self.post_json(ctx, url, data, &with_header(headers, Header::authorization(token)))
    }

    pub fn put_json_with_auth<T>(
        &self,
        ctx: &Context,
        url: &str,
        token: &str,
        data: &T,
        headers: &[Header],
    ) -> Result<HttpResponse>
    where
        T: Serialize + ?Sized,
    {
        self.put_json(ctx, url, data, &with_header(headers, Header::authorization(token)))
    }

    pub fn delete_json_with_auth(
        &self,
        ctx: &Context,
        url: &str,
        token: &str,
        headers: &[Header],
    ) -> Result<HttpResponse> {
        self.delete_json(ctx, url, &with_header(headers, Header::authorization(token)))
    }

    fn build(
        &self,
        ctx: &Context,
        method: &str,
        url: &str,
        body: Vec<u8>,
        headers: &[Header],
    ) -> std::result::Result<HttpRequest, BuildError> {
        let method = Method::from_bytes(method.as_bytes())?;
        let uri: Uri = url.parse()?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(BuildError::RelativeUrl(url.to_string()));
        }
        for header in headers {
            HeaderName::from_bytes(header.key.as_bytes())?;
            HeaderValue::from_str(&header.value).map_err(|source| BuildError::HeaderValue {
                name: header.key.clone(),
                source,
            })?;
        }

        Ok(HttpRequest {
            method,
            uri,
            headers: headers.to_vec(),
            body,
            timeout: self.effective_timeout(ctx),
        })
    }

    /// The tighter of the client timeout and the context's remaining time.
    fn effective_timeout(&self, ctx: &Context) -> Option<Duration> {
        let client = (!self.timeout.is_zero()).then_some(self.timeout);
        match (client, ctx.remaining()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

fn with_header(headers: &[Header], extra: Header) -> Vec<Header> {
    let mut all = Vec::with_capacity(headers.len() + 1);
    all.extend_from_slice(headers);
    all.push(extra);
    all
}
