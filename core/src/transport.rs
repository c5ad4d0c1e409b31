//! The seam between `Client` and the underlying HTTP stack.
//!
//! `Client` does validation, header assembly and status checks; a
//! `Transport` only moves bytes. `UreqTransport` is the default.

use std::fmt;
use std::thread;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{self, Either};
use tokio_util::sync::CancellationToken;
use ureq::{Agent, AsSendBody};

use crate::context::ContextError;
use crate::error::BoxError;
use crate::http::{Header, HttpRequest, HttpResponse, ResponseBody};

/// Executes one request and returns whatever the server answered.
///
/// Implementations must return non-2xx responses as `Ok`; the client owns
/// status interpretation. `HttpRequest::timeout`, when set, bounds the whole
/// round trip. When `cancel` fires while the request is in flight the
/// transport should give up and return `ContextError::Canceled`.
pub trait Transport: Send + Sync + fmt::Debug {
    fn round_trip(
        &self,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<HttpResponse, BoxError>;
}

/// Default transport backed by a pooled `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Run the blocking call on a worker thread and wait for either its
    /// answer or the cancel signal. A late answer is dropped with the
    /// channel, which closes its body.
    fn round_trip_cancellable(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, BoxError> {
        let (tx, rx) = oneshot::channel();
        let agent = self.agent.clone();
        thread::Builder::new()
            .name("httpkit-request".to_string())
            .spawn(move || {
                let _ = tx.send(execute(&agent, request));
            })?;

        let cancelled = cancel.cancelled();
        futures::pin_mut!(cancelled);
        match futures::executor::block_on(future::select(cancelled, rx)) {
            Either::Left(_) => Err(ContextError::Canceled.into()),
            Either::Right((Ok(result), _)) => result,
            Either::Right((Err(oneshot::Canceled), _)) => {
                Err("request worker exited without a response".into())
            }
        }
    }
}

impl Transport for UreqTransport {
    fn round_trip(
        &self,
        request: HttpRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<HttpResponse, BoxError> {
        match cancel {
            Some(cancel) => self.round_trip_cancellable(request, cancel),
            None => execute(&self.agent, request),
        }
    }
}

fn execute(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, BoxError> {
    let HttpRequest {
        method,
        uri,
        headers,
        body,
        timeout,
    } = request;

    let mut builder = http::Request::builder().method(method).uri(uri);
    for header in &headers {
        // `header` appends, so repeated keys all reach the wire.
        builder = builder.header(header.key.as_str(), header.value.as_str());
    }
    let head = builder.body(())?;

    let response = if body.is_empty() {
        run(agent, head, timeout)?
    } else {
        run(agent, head.map(|()| body), timeout)?
    };

    let (parts, body) = response.into_parts();
    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            Header::new(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    Ok(HttpResponse {
        status: parts.status.as_u16(),
        headers,
        body: ResponseBody::new(body.into_reader()),
    })
}

fn run<S: AsSendBody>(
    agent: &Agent,
    request: http::Request<S>,
    timeout: Option<Duration>,
) -> Result<http::Response<ureq::Body>, ureq::Error> {
    match timeout {
        Some(timeout) => {
            let request = agent
                .configure_request(request)
                .timeout_global(Some(timeout))
                .build();
            agent.run(request)
        }
        None => agent.run(request),
    }
}
