//! Process-wide default client and free functions that delegate to it.
//!
//! The default client is built on first use with `DEFAULT_TIMEOUT` and the
//! ureq transport. It cannot be reconfigured; build a `Client` for anything
//! else.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::client::{Client, DEFAULT_TIMEOUT};
use crate::context::Context;
use crate::error::Result;
use crate::http::{Header, HttpResponse};

static DEFAULT_CLIENT: Lazy<Client> = Lazy::new(|| Client::new(DEFAULT_TIMEOUT, None));

pub fn default_client() -> &'static Client {
    &DEFAULT_CLIENT
}

pub fn request(
    ctx: &Context,
    method: &str,
    url: &str,
    body: impl Into<Vec<u8>>,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.request(ctx, method, url, body, headers)
}

pub fn request_json<T: Serialize + ?Sized>(
    ctx: &Context,
    method: &str,
    url: &str,
    data: Option<&T>,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.request_json(ctx, method, url, data, headers)
}

pub fn get(ctx: &Context, url: &str, headers: &[Header]) -> Result<HttpResponse> {
    DEFAULT_CLIENT.get(ctx, url, headers)
}

pub fn post(
    ctx: &Context,
    url: &str,
    body: impl Into<Vec<u8>>,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.post(ctx, url, body, headers)
}

pub fn put(
    ctx: &Context,
    url: &str,
    body: impl Into<Vec<u8>>,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.put(ctx, url, body, headers)
}

pub fn delete(ctx: &Context, url: &str, headers: &[Header]) -> Result<HttpResponse> {
    DEFAULT_CLIENT.delete(ctx, url, headers)
}

pub fn get_with_auth(
    ctx: &Context,
    url: &str,
    token: &str,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.get_with_auth(ctx, url, token, headers)
}

pub fn post_with_auth(
    ctx: &Context,
    url: &str,
    token: &str,
    body: impl Into<Vec<u8>>,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.post_with_auth(ctx, url, token, body, headers)
}

pub fn put_with_auth(
    ctx: &Context,
    url: &str,
    token: &str,
    body: impl Into<Vec<u8>>,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.put_with_auth(ctx, url, token, body, headers)
}

pub fn delete_with_auth(
    ctx: &Context,
    url: &str,
    token: &str,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.delete_with_auth(ctx, url, token, headers)
}

pub fn get_json(ctx: &Context, url: &str, headers: &[Header]) -> Result<HttpResponse> {
    DEFAULT_CLIENT.get_json(ctx, url, headers)
}

pub fn post_json<T: Serialize + ?Sized>(
    ctx: &Context,
    url: &str,
    data: &T,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.post_json(ctx, url, data, headers)
}

pub fn put_json<T: Serialize + ?Sized>(
    ctx: &Context,
    url: &str,
    data: &T,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.put_json(ctx, url, data, headers)
}

pub fn delete_json(ctx: &Context, url: &str, headers: &[Header]) -> Result<HttpResponse> {
    DEFAULT_CLIENT.delete_json(ctx, url, headers)
}

pub fn get_json_with_auth(
    ctx: &Context,
    url: &str,
    token: &str,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.get_json_with_auth(ctx, url, token, headers)
}

pub fn post_json_with_auth<T: Serialize + ?Sized>(
    ctx: &Context,
    url: &str,
    token: &str,
    data: &T,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.post_json_with_auth(ctx, url, token, data, headers)
}

pub fn put_json_with_auth<T: Serialize + ?Sized>(
    ctx: &Context,
    url: &str,
    token: &str,
    data: &T,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.put_json_with_auth(ctx, url, token, data, headers)
}

pub fn delete_json_with_auth(
    ctx: &Context,
    url: &str,
    token: &str,
    headers: &[Header],
) -> Result<HttpResponse> {
    DEFAULT_CLIENT.delete_json_with_auth(ctx, url, token, headers)
}
